use glam::Vec3;
use physim_core::constraints::contact::{resolve_sphere_collisions, CollisionModel, SphereObstacle};
use physim_core::constraints::distance::EdgeConstraints;
use physim_core::particle::ParticleGrid;

const EPS: f32 = 1e-5;

fn unit_sphere() -> SphereObstacle {
    SphereObstacle::new(Vec3::ZERO, 1.0)
}

#[test]
fn test_outside_particle_untouched() {
    let sphere = unit_sphere();
    let models = [
        CollisionModel::Impulse { mu_n: 0.2, mu_t: 0.9 },
        CollisionModel::Pin { dt: 0.03 },
        CollisionModel::FrictionalSlide { frictional_coef: 0.8 },
    ];
    for model in models {
        let mut x = Vec3::new(0.0, 1.5, 0.0);
        let mut v = Vec3::new(0.3, -1.0, 0.0);
        assert!(!sphere.resolve(model, &mut x, &mut v));
        assert_eq!(x, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(v, Vec3::new(0.3, -1.0, 0.0));
    }
}

#[test]
fn test_impulse_restitution_and_friction() {
    let sphere = unit_sphere();
    let mut x = Vec3::new(0.0, 0.9, 0.0);
    let mut v = Vec3::new(2.0, -1.0, 0.0);
    assert!(sphere.resolve(CollisionModel::Impulse { mu_n: 0.2, mu_t: 0.9 }, &mut x, &mut v));
    assert!((x - Vec3::Y).length() < EPS);
    // vn = (0,-1,0), |vt| = 2: alpha = 1 - 0.9 * 1.2 * 1 / 2 = 0.46.
    assert!((v - Vec3::new(0.92, 0.2, 0.0)).length() < EPS, "v = {v:?}");
}

#[test]
fn test_impulse_friction_clamps_at_zero() {
    let sphere = unit_sphere();
    let mut x = Vec3::new(0.0, 0.9, 0.0);
    let mut v = Vec3::new(0.1, -1.0, 0.0);
    sphere.resolve(CollisionModel::Impulse { mu_n: 0.2, mu_t: 0.9 }, &mut x, &mut v);
    assert!((v - Vec3::new(0.0, 0.2, 0.0)).length() < EPS, "v = {v:?}");
}

#[test]
fn test_impulse_head_on_has_no_friction_term() {
    let sphere = unit_sphere();
    let mut x = Vec3::new(0.0, 0.5, 0.0);
    let mut v = Vec3::new(0.0, -2.0, 0.0);
    sphere.resolve(CollisionModel::Impulse { mu_n: 0.2, mu_t: 0.9 }, &mut x, &mut v);
    assert!(v.is_finite());
    assert!((v - Vec3::new(0.0, 0.4, 0.0)).length() < EPS, "v = {v:?}");
}

#[test]
fn test_impulse_keeps_outgoing_velocity() {
    let sphere = unit_sphere();
    let mut x = Vec3::new(0.0, 0.0, 0.8);
    let mut v = Vec3::new(0.1, 0.0, 0.5);
    sphere.resolve(CollisionModel::Impulse { mu_n: 0.2, mu_t: 0.9 }, &mut x, &mut v);
    assert!((x - Vec3::Z).length() < EPS);
    assert_eq!(v, Vec3::new(0.1, 0.0, 0.5));
}

#[test]
fn test_pin_velocity_is_displacement_over_dt() {
    let sphere = unit_sphere();
    let mut x = Vec3::new(0.6, 0.0, 0.0);
    let mut v = Vec3::new(-5.0, 1.0, 0.0);
    sphere.resolve(CollisionModel::Pin { dt: 0.1 }, &mut x, &mut v);
    assert!((x - Vec3::X).length() < EPS);
    assert!((v - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4, "v = {v:?}");
}

#[test]
fn test_frictional_slide_drops_normal_component() {
    let sphere = unit_sphere();
    let mut x = Vec3::new(0.0, 0.95, 0.0);
    let mut v = Vec3::new(1.0, -3.0, 0.5);
    sphere.resolve(CollisionModel::FrictionalSlide { frictional_coef: 0.8 }, &mut x, &mut v);
    assert!((x - Vec3::Y).length() < EPS);
    assert!((v - Vec3::new(0.2, 0.0, 0.1)).length() < EPS, "v = {v:?}");
}

#[test]
fn test_particle_at_center_pushed_up() {
    let sphere = SphereObstacle::new(Vec3::new(1.0, 2.0, 3.0), 0.5);
    let mut x = sphere.center;
    let mut v = Vec3::ZERO;
    assert!(sphere.resolve(CollisionModel::Pin { dt: 0.03 }, &mut x, &mut v));
    assert!((x - Vec3::new(1.0, 2.5, 3.0)).length() < EPS);
    assert!(v.is_finite());
}

#[test]
fn test_batch_resolution_counts_contacts() {
    let sphere = unit_sphere();
    let mut positions = vec![
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -0.2),
    ];
    let mut velocities = vec![Vec3::NEG_Y; 3];
    let contacts = resolve_sphere_collisions(
        &sphere,
        CollisionModel::FrictionalSlide { frictional_coef: 0.5 },
        &mut positions,
        &mut velocities,
    );
    assert_eq!(contacts, 2);
    for x in &positions {
        assert!(x.length() >= 1.0 - EPS);
    }
}

#[test]
fn test_edge_constraints_on_stretched_lattice() {
    let mut grid = ParticleGrid::new(4, 2.0, 0.0);
    for x in grid.position.iter_mut() {
        *x *= 1.1;
    }
    let mut edges = EdgeConstraints::new(grid.n, grid.spacing);
    let max = edges.evaluate(&grid.position);
    // C = (1.1 L)^2 / L - L = 0.21 L
    assert!((max - 0.21).abs() < 1e-4, "max strain {max}");
    assert!(edges.total_violation() > 0.0);
    let edge = 2 * grid.index(1, 1);
    assert!((edges.grad_constraint[edge] - 2.2).abs() < 1e-4);
}
