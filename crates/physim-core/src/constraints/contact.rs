use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::math::{direction_and_length, DEGENERATE_EPSILON};

/// The single static analytic collider of a cloth scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereObstacle {
    pub center: Vec3,
    pub radius: f32,
}

/// How a particle found inside the obstacle has its velocity rewritten.
///
/// All models first project the particle onto the sphere surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CollisionModel {
    /// Restitution along the normal plus Coulomb-style tangential friction.
    Impulse { mu_n: f32, mu_t: f32 },
    /// Velocity becomes the displacement to the surface over `dt`.
    Pin { dt: f32 },
    /// No bounce; inward motion keeps only a damped tangential component.
    FrictionalSlide { frictional_coef: f32 },
}

impl SphereObstacle {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Outward surface normal for `p`.
    ///
    /// A point at the exact center has no defined normal and is pushed out
    /// along `+Y`.
    #[inline]
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        let (dir, _) = direction_and_length(p - self.center);
        if dir == Vec3::ZERO {
            Vec3::Y
        } else {
            dir
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        (p - self.center).length() <= self.radius
    }

    /// Resolve one particle. Returns `true` when it was in contact.
    pub fn resolve(&self, model: CollisionModel, x: &mut Vec3, v: &mut Vec3) -> bool {
        if !self.contains(*x) {
            return false;
        }
        let normal = self.normal_at(*x);
        let target = self.center + normal * self.radius;

        match model {
            CollisionModel::Impulse { mu_n, mu_t } => {
                *x = target;
                let vn_mag = v.dot(normal);
                if vn_mag < 0.0 {
                    let vn = normal * vn_mag;
                    let vt = *v - vn;
                    let vt_len = vt.length();
                    // No tangential motion, no friction impulse.
                    let alpha = if vt_len < DEGENERATE_EPSILON {
                        1.0
                    } else {
                        (1.0 - mu_t * (1.0 + mu_n) * vn.length() / vt_len).max(0.0)
                    };
                    *v = -mu_n * vn + alpha * vt;
                }
            }
            CollisionModel::Pin { dt } => {
                *v = (target - *x) / dt;
                *x = target;
            }
            CollisionModel::FrictionalSlide { frictional_coef } => {
                *x = target;
                let vn_mag = v.dot(normal);
                if vn_mag < 0.0 {
                    let vt = *v - normal * vn_mag;
                    *v = (1.0 - frictional_coef) * vt;
                }
            }
        }
        true
    }
}

/// Resolve every particle against the obstacle and return the contact count.
pub fn resolve_sphere_collisions(
    obstacle: &SphereObstacle,
    model: CollisionModel,
    positions: &mut [Vec3],
    velocities: &mut [Vec3],
) -> usize {
    #[cfg(feature = "parallel")]
    {
        positions
            .par_iter_mut()
            .zip(velocities.par_iter_mut())
            .map(|(x, v)| usize::from(obstacle.resolve(model, x, v)))
            .sum()
    }

    #[cfg(not(feature = "parallel"))]
    {
        positions
            .iter_mut()
            .zip(velocities.iter_mut())
            .map(|(x, v)| usize::from(obstacle.resolve(model, x, v)))
            .sum()
    }
}
