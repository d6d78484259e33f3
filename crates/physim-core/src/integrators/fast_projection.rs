use glam::Vec3;
use tracing::{debug, warn};

use crate::anchors::Anchors;
use crate::config::ClothConfig;
use crate::constraints::contact::{resolve_sphere_collisions, CollisionModel};
use crate::constraints::distance::EdgeConstraints;
use crate::error::SimError;
use crate::integrators::{advance_positions, damp_and_accelerate, FrameStats, Integrator, Variant};
use crate::particle::ParticleGrid;

/// Inextensible cloth: unconstrained prediction followed by iterative
/// projection onto the manifold of rest-length edges.
///
/// There are no springs. Edge lengths are enforced purely by global
/// projection steps over all edges at once, repeated until every normalized
/// violation is below `strain_threshold` (or `max_projection_iterations`
/// runs out), and velocities absorb the projection displacement.
pub struct FastProjection {
    config: ClothConfig,
    grid: ParticleGrid,
    anchors: Anchors,
    edges: EdgeConstraints,
    inv_mass: Vec<f32>,
    predicted: Vec<Vec3>,
}

impl FastProjection {
    pub fn new(config: ClothConfig) -> Result<Self, SimError> {
        config.validate()?;
        let grid = ParticleGrid::new(config.n, config.grid_length, config.height);
        let anchors = Anchors::top_corners(&grid);
        let edges = EdgeConstraints::new(config.n, grid.spacing);
        let inv_mass = Self::inverse_masses(&grid, &anchors, config.mass);
        debug!(n = config.n, threshold = config.strain_threshold, "fast projection cloth created");
        Ok(Self {
            predicted: grid.position.clone(),
            config,
            grid,
            anchors,
            edges,
            inv_mass,
        })
    }

    fn inverse_masses(grid: &ParticleGrid, anchors: &Anchors, mass: f32) -> Vec<f32> {
        (0..grid.count())
            .map(|p| if anchors.is_pinned(p) { 0.0 } else { 1.0 / mass })
            .collect()
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn anchors(&self) -> &Anchors {
        &self.anchors
    }

    pub fn edges(&self) -> &EdgeConstraints {
        &self.edges
    }

    pub fn grid_mut(&mut self) -> &mut ParticleGrid {
        &mut self.grid
    }

    /// Explicit predictor with gravity only, then re-pin anchors.
    pub fn predict(&mut self) {
        let dt = self.config.dt;
        damp_and_accelerate(&mut self.grid.velocity, self.config.damping, self.config.gravity, dt);
        advance_positions(&mut self.grid.position, &self.grid.velocity, dt);
        self.anchors.apply(&mut self.grid.position, &mut self.grid.velocity);
    }

    /// Project positions until the largest violation drops below the
    /// threshold. Returns `(iterations, max_strain)`.
    pub fn project(&mut self) -> (u32, f32) {
        let threshold = self.config.strain_threshold;
        let mut max_strain = self.edges.evaluate(&self.grid.position);
        let mut iterations = 0;
        while max_strain > threshold && iterations < self.config.max_projection_iterations {
            self.edges.project(&mut self.grid.position, &self.inv_mass);
            max_strain = self.edges.evaluate(&self.grid.position);
            iterations += 1;
        }
        if max_strain > threshold {
            warn!(
                iterations,
                max_strain,
                threshold,
                "fast projection stopped at the iteration cap"
            );
        }
        (iterations, max_strain)
    }
}

impl Integrator for FastProjection {
    fn step_frame(&mut self) -> FrameStats {
        let dt = self.config.dt;
        self.predict();
        self.predicted.copy_from_slice(&self.grid.position);

        let (projection_iterations, max_strain) = self.project();
        for ((v, x), x_pred) in self
            .grid
            .velocity
            .iter_mut()
            .zip(&self.grid.position)
            .zip(&self.predicted)
        {
            *v += (*x - *x_pred) / dt;
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
            substeps: 1,
            contacts,
            kinetic_energy: self.grid.kinetic_energy(self.config.mass),
            max_strain,
            projection_iterations,
        }
    }

    fn grid(&self) -> &ParticleGrid {
        &self.grid
    }

    fn reset(&mut self) {
        self.grid.init();
        self.anchors = Anchors::top_corners(&self.grid);
        self.inv_mass = Self::inverse_masses(&self.grid, &self.anchors, self.config.mass);
        self.predicted.copy_from_slice(&self.grid.position);
        self.edges.evaluate(&self.grid.position);
    }

    fn variant(&self) -> Variant {
        Variant::FastProjection
    }

    fn frame_time(&self) -> f32 {
        self.config.dt
    }
}
