//! Cloth time integrators.
//!
//! Every scheme advances the same [`ParticleGrid`] one rendered frame at a
//! time. Passes are data-parallel over particles; each pass reads a complete
//! snapshot of the previous one, so the pass boundary is the barrier.

pub mod explicit;
pub mod fast_projection;
pub mod implicit;
pub mod pbd;

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::SimError;
use crate::particle::ParticleGrid;

pub use explicit::ExplicitEuler;
pub use fast_projection::FastProjection;
pub use implicit::ImplicitEuler;
pub use pbd::PositionBased;

/// The available cloth integration schemes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    ExplicitEuler,
    ImplicitEuler,
    PositionBased,
    FastProjection,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::ExplicitEuler,
        Variant::ImplicitEuler,
        Variant::PositionBased,
        Variant::FastProjection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::ExplicitEuler => "explicit",
            Variant::ImplicitEuler => "implicit",
            Variant::PositionBased => "pbd",
            Variant::FastProjection => "fast-projection",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explicit" | "explicit-euler" => Ok(Variant::ExplicitEuler),
            "implicit" | "implicit-euler" => Ok(Variant::ImplicitEuler),
            "pbd" | "position-based" => Ok(Variant::PositionBased),
            "fast-projection" | "fast_projection" | "inextensible" => Ok(Variant::FastProjection),
            other => Err(SimError::UnknownVariant(other.to_string())),
        }
    }
}

/// Diagnostics gathered while stepping one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Integration substeps or relaxation passes executed.
    pub substeps: u32,
    /// Particles resolved against the obstacle this frame.
    pub contacts: usize,
    /// Total kinetic energy after the frame.
    pub kinetic_energy: f32,
    /// Largest normalized edge violation (fast projection only).
    pub max_strain: f32,
    /// Projection sweeps performed (fast projection only).
    pub projection_iterations: u32,
}

/// A cloth integration scheme that owns its grid and scratch buffers.
pub trait Integrator: Send {
    /// Advance the simulation by one rendered frame.
    fn step_frame(&mut self) -> FrameStats;

    fn grid(&self) -> &ParticleGrid;

    /// Return to the rest lattice, clearing all scratch state.
    fn reset(&mut self);

    fn variant(&self) -> Variant;

    /// Simulated seconds covered by one `step_frame`.
    fn frame_time(&self) -> f32;
}

/// Evaluate `f` for every particle index into a fresh buffer.
///
/// This is one data-parallel pass: `f` only reads state from before the
/// pass, and the caller applies the result afterwards.
pub(crate) fn per_particle<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..count).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..count).map(f).collect()
    }
}

/// `v *= damping` then `v += a·dt` for every particle.
pub(crate) fn damp_and_accelerate(
    velocity: &mut [Vec3],
    damping: f32,
    acceleration: Vec3,
    dt: f32,
) {
    #[cfg(feature = "parallel")]
    velocity.par_iter_mut().for_each(|v| {
        *v = *v * damping + acceleration * dt;
    });

    #[cfg(not(feature = "parallel"))]
    for v in velocity.iter_mut() {
        *v = *v * damping + acceleration * dt;
    }
}

/// `x += v·dt` for every particle.
pub(crate) fn advance_positions(position: &mut [Vec3], velocity: &[Vec3], dt: f32) {
    #[cfg(feature = "parallel")]
    position
        .par_iter_mut()
        .zip(velocity.par_iter())
        .for_each(|(x, v)| *x += *v * dt);

    #[cfg(not(feature = "parallel"))]
    for (x, v) in position.iter_mut().zip(velocity) {
        *x += *v * dt;
    }
}
