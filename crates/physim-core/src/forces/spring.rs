//! Hookean springs over the neighbor stencil.

use glam::Vec3;

use crate::math::{direction_and_length, DEGENERATE_EPSILON};
use crate::particle::ParticleGrid;
use crate::stencil::{neighbors, Offset};

/// Force on `x_self` from a spring to `x_other`: `-k·(‖Δx‖ − L)·Δx̂`.
///
/// Coincident particles have no direction and exert no force.
#[inline]
pub fn hooke_force(x_self: Vec3, x_other: Vec3, rest_length: f32, k: f32) -> Vec3 {
    let (dir, len) = direction_and_length(x_self - x_other);
    -k * (len - rest_length) * dir
}

/// Linearized spring term of the implicit local energy gradient,
/// `k·(1 − L/‖Δx‖)·Δx`, using the current separation.
#[inline]
pub fn spring_gradient(x_self: Vec3, x_other: Vec3, rest_length: f32, k: f32) -> Vec3 {
    let diff = x_self - x_other;
    let len = diff.length();
    if len < DEGENERATE_EPSILON {
        return Vec3::ZERO;
    }
    k * (1.0 - rest_length / len) * diff
}

/// Net spring force on particle `idx` from every in-bounds stencil neighbor.
pub fn net_spring_force(
    positions: &[Vec3],
    grid: &ParticleGrid,
    idx: usize,
    stencil: &[Offset],
    k: f32,
) -> Vec3 {
    let (row, col) = (idx / grid.n, idx % grid.n);
    neighbors(row, col, grid.n, grid.spacing, stencil)
        .map(|(q, rest)| hooke_force(positions[idx], positions[q], rest, k))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_at_rest_is_zero() {
        let f = hooke_force(Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), 0.5, 1e5);
        assert!(f.length() < 1e-6);
    }

    #[test]
    fn test_stretched_spring_pulls_together() {
        let f = hooke_force(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.0, 10.0);
        assert!((f - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_coincident_particles_exert_nothing() {
        assert_eq!(hooke_force(Vec3::ONE, Vec3::ONE, 1.0, 10.0), Vec3::ZERO);
        assert_eq!(spring_gradient(Vec3::ONE, Vec3::ONE, 1.0, 10.0), Vec3::ZERO);
    }

    #[test]
    fn test_spring_gradient_is_antisymmetric() {
        let a = Vec3::new(0.1, 0.2, 0.0);
        let b = Vec3::new(1.0, -0.3, 0.4);
        let gab = spring_gradient(a, b, 0.7, 50.0);
        let gba = spring_gradient(b, a, 0.7, 50.0);
        assert!((gab + gba).length() < 1e-5);
    }
}
