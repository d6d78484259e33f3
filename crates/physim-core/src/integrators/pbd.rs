use glam::Vec3;
use tracing::debug;

use crate::anchors::Anchors;
use crate::config::ClothConfig;
use crate::constraints::contact::{resolve_sphere_collisions, CollisionModel};
use crate::error::SimError;
use crate::integrators::{
    advance_positions, damp_and_accelerate, per_particle, FrameStats, Integrator, Variant,
};
use crate::math::direction_and_length;
use crate::particle::ParticleGrid;
use crate::stencil::{neighbors, BENDING_STENCIL};

/// Weight of a particle's own position in the projection average.
pub const SELF_WEIGHT: f32 = 0.2;

/// Position-based cloth with averaged rest-length projection.
///
/// After an explicit predictor, each projection pass moves every particle to
/// a weighted mean of itself and the targets its 12 stencil neighbors would
/// place it at, and back-derives velocity from the displacement.
pub struct PositionBased {
    config: ClothConfig,
    grid: ParticleGrid,
    anchors: Anchors,
    /// Accumulated neighbor targets per particle.
    pub sum_x: Vec<Vec3>,
    /// Number of targets accumulated per particle.
    pub sum_n: Vec<u32>,
}

impl PositionBased {
    pub fn new(config: ClothConfig) -> Result<Self, SimError> {
        config.validate()?;
        let grid = ParticleGrid::new(config.n, config.grid_length, config.height);
        let anchors = Anchors::top_corners(&grid);
        let count = grid.count();
        debug!(
            n = config.n,
            passes = config.num_substep,
            anchors = anchors.len(),
            "position based cloth created"
        );
        Ok(Self {
            config,
            grid,
            anchors,
            sum_x: vec![Vec3::ZERO; count],
            sum_n: vec![0; count],
        })
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn anchors(&self) -> &Anchors {
        &self.anchors
    }

    pub fn grid_mut(&mut self) -> &mut ParticleGrid {
        &mut self.grid
    }

    /// `v *= damping; v += g·dt; x += v·dt`.
    pub fn predict(&mut self) {
        let dt = self.config.dt;
        damp_and_accelerate(&mut self.grid.velocity, self.config.damping, self.config.gravity, dt);
        advance_positions(&mut self.grid.position, &self.grid.velocity, dt);
    }

    /// Accumulate `½·(x_p + x_q + L·dir(x_p − x_q))` over every neighbor.
    pub fn accumulate(&mut self) {
        let grid = &self.grid;
        let sums = per_particle(grid.count(), |p| {
            let x = &grid.position;
            let (row, col) = (p / grid.n, p % grid.n);
            neighbors(row, col, grid.n, grid.spacing, &BENDING_STENCIL).fold(
                (Vec3::ZERO, 0u32),
                |(sum, count), (q, rest)| {
                    let (dir, _) = direction_and_length(x[p] - x[q]);
                    (sum + 0.5 * (x[p] + x[q] + rest * dir), count + 1)
                },
            )
        });
        for (p, (sum, count)) in sums.into_iter().enumerate() {
            self.sum_x[p] += sum;
            self.sum_n[p] += count;
        }
    }

    /// Move each particle to the weighted mean of itself and its targets,
    /// adding the implied displacement velocity.
    pub fn resolve(&mut self) {
        let inv_dt = 1.0 / self.config.dt;
        for p in 0..self.grid.count() {
            let x = self.grid.position[p];
            let target = (SELF_WEIGHT * x + self.sum_x[p]) / (SELF_WEIGHT + self.sum_n[p] as f32);
            self.grid.velocity[p] += inv_dt * (target - x);
            self.grid.position[p] = target;
        }
    }

    /// One projection pass: accumulate, resolve, re-pin anchors, clear sums.
    pub fn project(&mut self) {
        self.accumulate();
        self.resolve();
        self.anchors.apply(&mut self.grid.position, &mut self.grid.velocity);
        self.sum_x.fill(Vec3::ZERO);
        self.sum_n.fill(0);
    }
}

impl Integrator for PositionBased {
    fn step_frame(&mut self) -> FrameStats {
        self.predict();
        for _ in 0..self.config.num_substep {
            self.project();
        }

        let contacts = match &self.config.obstacle {
            Some(obstacle) => resolve_sphere_collisions(
                obstacle,
                CollisionModel::FrictionalSlide {
                    frictional_coef: self.config.frictional_coef,
                },
                &mut self.grid.position,
                &mut self.grid.velocity,
            ),
            None => 0,
        };
        self.anchors.apply(&mut self.grid.position, &mut self.grid.velocity);

        FrameStats {
            substeps: self.config.num_substep,
            contacts,
            kinetic_energy: self.grid.kinetic_energy(self.config.mass),
            ..FrameStats::default()
        }
    }

    fn grid(&self) -> &ParticleGrid {
        &self.grid
    }

    fn reset(&mut self) {
        self.grid.init();
        self.anchors = Anchors::top_corners(&self.grid);
        self.sum_x.fill(Vec3::ZERO);
        self.sum_n.fill(0);
    }

    fn variant(&self) -> Variant {
        Variant::PositionBased
    }

    fn frame_time(&self) -> f32 {
        self.config.dt
    }
}
