use glam::Vec3;

use crate::constraints::contact::SphereObstacle;
use crate::error::SimError;

/// Immutable cloth simulation parameters, fixed at solver construction.
///
/// Each integrator has a preset tuned to stay stable with its own scheme;
/// the `with_*` setters adjust a preset before it is handed to a solver.
#[derive(Clone, Debug, PartialEq)]
pub struct ClothConfig {
    /// Vertices per side.
    pub n: usize,
    /// Total side length of the cloth.
    pub grid_length: f32,
    /// Initial height of the cloth plane.
    pub height: f32,
    pub dt: f32,
    /// Substeps (explicit) or relaxation/projection passes (other schemes) per frame.
    pub num_substep: u32,
    /// Multiplicative velocity damping applied once per integration step.
    pub damping: f32,
    pub gravity: Vec3,
    /// Per-particle mass.
    pub mass: f32,
    pub spring_k: f32,
    /// Tangential friction coefficient of the impulse collision model.
    pub mu_t: f32,
    /// Normal restitution coefficient of the impulse collision model.
    pub mu_n: f32,
    /// Tangential velocity loss of the frictional-slide collision model.
    pub frictional_coef: f32,
    pub obstacle: Option<SphereObstacle>,
    /// Relative edge strain at which fast projection stops iterating.
    pub strain_threshold: f32,
    pub max_projection_iterations: u32,
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self::explicit_euler()
    }
}

impl ClothConfig {
    /// Stiff springs, tiny step and many substeps.
    pub fn explicit_euler() -> Self {
        Self {
            n: 128,
            grid_length: 2.0,
            height: 0.8,
            dt: 1e-3,
            num_substep: 30,
            damping: 0.99,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            mass: 1.0,
            spring_k: 1e5,
            mu_t: 0.9,
            mu_n: 0.2,
            frictional_coef: 0.8,
            obstacle: Some(SphereObstacle::new(Vec3::ZERO, 0.5)),
            strain_threshold: 1e-3,
            max_projection_iterations: 64,
        }
    }

    pub fn implicit_euler() -> Self {
        Self {
            n: 64,
            dt: 0.03,
            num_substep: 50,
            spring_k: 8000.0,
            mu_t: 0.8,
            mu_n: 0.0,
            obstacle: Some(SphereObstacle::new(Vec3::ZERO, 0.4)),
            ..Self::explicit_euler()
        }
    }

    pub fn position_based() -> Self {
        Self {
            n: 64,
            dt: 0.03,
            num_substep: 50,
            spring_k: 8000.0,
            obstacle: Some(SphereObstacle::new(Vec3::ZERO, 0.4)),
            ..Self::explicit_euler()
        }
    }

    /// Small inextensible sheet hanging from two corners; no obstacle.
    pub fn fast_projection() -> Self {
        Self {
            n: 21,
            dt: 1e-3,
            num_substep: 32,
            obstacle: None,
            ..Self::explicit_euler()
        }
    }

    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_substeps(mut self, num_substep: u32) -> Self {
        self.num_substep = num_substep;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_spring_k(mut self, spring_k: f32) -> Self {
        self.spring_k = spring_k;
        self
    }

    pub fn with_obstacle(mut self, obstacle: Option<SphereObstacle>) -> Self {
        self.obstacle = obstacle;
        self
    }

    pub fn with_strain_threshold(mut self, strain_threshold: f32) -> Self {
        self.strain_threshold = strain_threshold;
        self
    }

    /// Lattice spacing `L / n`.
    #[inline]
    pub fn spacing(&self) -> f32 {
        self.grid_length / self.n as f32
    }

    /// `1 / dt²`, the inertia scale of the implicit energy.
    #[inline]
    pub fn t_inverse(&self) -> f32 {
        1.0 / (self.dt * self.dt)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.n < 2 {
            return Err(SimError::InvalidGridSize(self.n));
        }
        if !(self.grid_length.is_finite() && self.grid_length > 0.0) {
            return Err(SimError::InvalidGridLength(self.grid_length));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidTimeStep(self.dt));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(SimError::InvalidMass(self.mass));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(SimError::InvalidDamping(self.damping));
        }
        if let Some(obstacle) = &self.obstacle {
            if !(obstacle.radius.is_finite() && obstacle.radius > 0.0) {
                return Err(SimError::InvalidObstacle(obstacle.radius));
            }
        }
        Ok(())
    }
}

/// Ray tracer output settings.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Color of rays that escape the scene.
    pub background: Vec3,
    /// Base seed for lens sampling; each row derives its own stream.
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            background: Vec3::new(0.0, 0.0, 1.0),
            seed: 0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for (name, config) in [
            ("explicit", ClothConfig::explicit_euler()),
            ("implicit", ClothConfig::implicit_euler()),
            ("pbd", ClothConfig::position_based()),
            ("fast projection", ClothConfig::fast_projection()),
        ] {
            assert!(config.validate().is_ok(), "{} preset must validate", name);
        }
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        let config = ClothConfig::default().with_n(1);
        assert_eq!(config.validate(), Err(SimError::InvalidGridSize(1)));
    }

    #[test]
    fn test_rejects_bad_time_step() {
        let config = ClothConfig::default().with_dt(0.0);
        assert!(matches!(config.validate(), Err(SimError::InvalidTimeStep(_))));
        let config = ClothConfig::default().with_dt(f32::NAN);
        assert!(matches!(config.validate(), Err(SimError::InvalidTimeStep(_))));
    }

    #[test]
    fn test_rejects_bad_obstacle() {
        let config =
            ClothConfig::default().with_obstacle(Some(SphereObstacle::new(Vec3::ZERO, -1.0)));
        assert!(matches!(config.validate(), Err(SimError::InvalidObstacle(_))));
    }

    #[test]
    fn test_render_config_resolution() {
        let config = RenderConfig {
            width: 0,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());
        assert!((RenderConfig::default().aspect_ratio() - 640.0 / 480.0).abs() < 1e-6);
    }
}
