use glam::Vec3;
use physim_core::tracer::camera::{CameraKey, MOVE_STEP};
use physim_core::tracer::Camera;

#[test]
fn test_basis_is_orthonormal() {
    let camera = Camera::default();
    let (x, y, z) = camera.basis();
    assert!((z - Vec3::Z).length() < 1e-6);
    assert!((x - Vec3::X).length() < 1e-6);
    assert!((y - Vec3::Y).length() < 1e-6);
    assert!(x.dot(y).abs() < 1e-6 && y.dot(z).abs() < 1e-6);
}

#[test]
fn test_corner_rays_span_field_of_view() {
    let camera = Camera {
        aperture: 0.0,
        ..Camera::default()
    };
    let mut rng = fastrand::Rng::with_seed(1);
    let top = camera.get_ray(0.5, 1.0, &mut rng).direction;
    let bottom = camera.get_ray(0.5, 0.0, &mut rng).direction;
    let angle = top.angle_between(bottom).to_degrees();
    assert!((angle - camera.vertical_fov).abs() < 1e-2, "angle {angle}");
    assert!((top.length() - 1.0).abs() < 1e-5);
}

#[test]
fn test_lens_jitter_stays_within_aperture() {
    let camera = Camera {
        aperture: 0.5,
        ..Camera::default()
    };
    let mut rng = fastrand::Rng::with_seed(9);
    for _ in 0..200 {
        let ray = camera.get_ray(0.3, 0.7, &mut rng);
        assert!((ray.origin - camera.position).length() <= 0.25 + 1e-5);
    }
}

#[test]
fn test_first_matching_key_wins() {
    let mut camera = Camera::default();
    let start = camera.position;
    assert_eq!(camera.apply_keys(&[CameraKey::W, CameraKey::A]), Some(CameraKey::A));
    assert_eq!(camera.position, start + Vec3::new(MOVE_STEP, 0.0, 0.0));

    assert_eq!(camera.apply_keys(&[CameraKey::E, CameraKey::Q]), Some(CameraKey::Q));
    assert!((camera.position.y + MOVE_STEP).abs() < 1e-6);

    let before = camera.position;
    assert_eq!(camera.apply_keys(&[]), None);
    assert_eq!(camera.position, before);
}

#[test]
fn test_key_directions() {
    let cases = [
        ('a', Vec3::X),
        ('d', Vec3::NEG_X),
        ('s', Vec3::Z),
        ('w', Vec3::NEG_Z),
        ('q', Vec3::NEG_Y),
        ('e', Vec3::Y),
    ];
    for (c, dir) in cases {
        let key = CameraKey::from_char(c).unwrap();
        assert_eq!(key.delta(), dir * MOVE_STEP, "key {c}");
        assert_eq!(CameraKey::from_char(c.to_ascii_uppercase()), Some(key));
    }
    assert_eq!(CameraKey::from_char('x'), None);
}

#[test]
fn test_look_at_is_not_moved_by_keys() {
    let mut camera = Camera::default();
    camera.apply_keys(&[CameraKey::S]);
    assert_eq!(camera.look_at, Vec3::new(0.0, 0.0, 2.0));
}
