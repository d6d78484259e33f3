use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::error::SimError;
use crate::tracer::ray::Ray;

/// Position step applied per held key per frame.
pub const MOVE_STEP: f32 = 0.05;

/// Thin-lens look-at camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub vertical_fov: f32,
    pub aspect_ratio: f32,
    /// Lens diameter; zero gives a pinhole.
    pub aperture: f32,
    /// Distance to the plane of perfect focus.
    pub focus: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 4.0),
            look_at: Vec3::new(0.0, 0.0, 2.0),
            up: Vec3::Y,
            vertical_fov: 30.0,
            aspect_ratio: 640.0 / 480.0,
            aperture: 0.01,
            focus: 4.0,
        }
    }
}

/// Keys the viewer forwards to the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraKey {
    A,
    D,
    S,
    W,
    Q,
    E,
}

impl CameraKey {
    /// Priority order when several keys are held.
    pub const PRIORITY: [CameraKey; 6] = [
        CameraKey::A,
        CameraKey::D,
        CameraKey::S,
        CameraKey::W,
        CameraKey::Q,
        CameraKey::E,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(CameraKey::A),
            'd' => Some(CameraKey::D),
            's' => Some(CameraKey::S),
            'w' => Some(CameraKey::W),
            'q' => Some(CameraKey::Q),
            'e' => Some(CameraKey::E),
            _ => None,
        }
    }

    pub fn delta(&self) -> Vec3 {
        match self {
            CameraKey::A => Vec3::new(MOVE_STEP, 0.0, 0.0),
            CameraKey::D => Vec3::new(-MOVE_STEP, 0.0, 0.0),
            CameraKey::S => Vec3::new(0.0, 0.0, MOVE_STEP),
            CameraKey::W => Vec3::new(0.0, 0.0, -MOVE_STEP),
            CameraKey::Q => Vec3::new(0.0, -MOVE_STEP, 0.0),
            CameraKey::E => Vec3::new(0.0, MOVE_STEP, 0.0),
        }
    }
}

/// Uniform sample on the unit disk: `r = √ξ₁`, `θ = 2πξ₂`.
pub fn random_in_disk(rng: &mut fastrand::Rng) -> Vec2 {
    let r = rng.f32().sqrt();
    let theta = TAU * rng.f32();
    r * Vec2::new(theta.cos(), theta.sin())
}

impl Camera {
    pub fn validate(&self) -> Result<(), SimError> {
        if (self.position - self.look_at).length_squared() == 0.0 {
            return Err(SimError::InvalidCamera("position and look_at coincide"));
        }
        if !(self.vertical_fov > 0.0 && self.vertical_fov < 180.0) {
            return Err(SimError::InvalidCamera("vertical_fov must be in (0, 180) degrees"));
        }
        if !(self.aspect_ratio > 0.0 && self.focus > 0.0 && self.aperture >= 0.0) {
            return Err(SimError::InvalidCamera("aspect ratio and focus must be positive"));
        }
        if self.up.cross(self.position - self.look_at).length_squared() == 0.0 {
            return Err(SimError::InvalidCamera("up is parallel to the view direction"));
        }
        Ok(())
    }

    /// Orthonormal `(x, y, z)` basis; `z` points from the target to the eye.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let zdir = (self.position - self.look_at).normalize_or_zero();
        let xdir = self.up.cross(zdir).normalize_or_zero();
        let ydir = zdir.cross(xdir);
        (xdir, ydir, zdir)
    }

    /// Ray through screen point `(u, v)`, `(0, 0)` lower left and `(1, 1)`
    /// upper right, leaving a random point of the lens.
    pub fn get_ray(&self, u: f32, v: f32, rng: &mut fastrand::Rng) -> Ray {
        let half_height = (0.5 * self.vertical_fov.to_radians()).tan();
        let half_width = half_height * self.aspect_ratio;
        let (xdir, ydir, zdir) = self.basis();

        let lower_left = self.position
            - self.focus * zdir
            - half_width * self.focus * xdir
            - half_height * self.focus * ydir;
        let horizontal = 2.0 * half_width * self.focus * xdir;
        let vertical = 2.0 * half_height * self.focus * ydir;

        let disk = 0.5 * self.aperture * random_in_disk(rng);
        let origin = self.position + xdir * disk.x + ydir * disk.y;
        let target = lower_left + u * horizontal + v * vertical;
        Ray::new(origin, (target - origin).normalize_or_zero())
    }

    /// Apply the first held key in `CameraKey::PRIORITY` order, replacing
    /// the position. Returns the key applied.
    pub fn apply_keys(&mut self, held: &[CameraKey]) -> Option<CameraKey> {
        let key = CameraKey::PRIORITY.into_iter().find(|k| held.contains(k))?;
        self.position = self.position + key.delta();
        Some(key)
    }
}
