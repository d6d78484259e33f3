use tracing::{debug, trace, warn};

use crate::config::ClothConfig;
use crate::constraints::contact::SphereObstacle;
use crate::error::SimError;
use crate::integrators::{
    ExplicitEuler, FastProjection, FrameStats, ImplicitEuler, Integrator, PositionBased, Variant,
};
use crate::math::is_finite;
use crate::mesh::ClothMesh;
use crate::particle::ParticleGrid;

/// One cloth simulation plus the mesh buffers handed to the renderer.
pub struct ClothSolver {
    integrator: Box<dyn Integrator>,
    mesh: ClothMesh,
    obstacle: Option<SphereObstacle>,
    time: f32,
    frame: u64,
}

impl ClothSolver {
    /// Build a solver for `variant` with an explicit configuration.
    pub fn new(variant: Variant, config: ClothConfig) -> Result<Self, SimError> {
        let obstacle = config.obstacle;
        let integrator: Box<dyn Integrator> = match variant {
            Variant::ExplicitEuler => Box::new(ExplicitEuler::new(config)?),
            Variant::ImplicitEuler => Box::new(ImplicitEuler::new(config)?),
            Variant::PositionBased => Box::new(PositionBased::new(config)?),
            Variant::FastProjection => Box::new(FastProjection::new(config)?),
        };
        let mesh = ClothMesh::new(integrator.grid());
        debug!(
            %variant,
            vertices = mesh.vertices.len(),
            triangles = mesh.triangle_count(),
            "cloth solver ready"
        );
        Ok(Self {
            integrator,
            mesh,
            obstacle,
            time: 0.0,
            frame: 0,
        })
    }

    /// Build a solver with the preset configuration of `variant`.
    pub fn with_preset(variant: Variant) -> Result<Self, SimError> {
        Self::new(variant, preset(variant))
    }

    /// Advance one frame and refresh the vertex buffer.
    pub fn step(&mut self) -> FrameStats {
        let stats = self.integrator.step_frame();
        self.mesh.update(self.integrator.grid());
        self.time += self.integrator.frame_time();
        self.frame += 1;
        let finite = self.grid().position.iter().all(|x| is_finite(*x));
        if !stats.kinetic_energy.is_finite() || !finite {
            warn!(frame = self.frame, variant = %self.variant(), "cloth state is no longer finite");
        }
        trace!(
            frame = self.frame,
            contacts = stats.contacts,
            kinetic_energy = stats.kinetic_energy,
            max_strain = stats.max_strain,
            "cloth frame"
        );
        stats
    }

    pub fn reset(&mut self) {
        self.integrator.reset();
        self.mesh.update(self.integrator.grid());
        self.time = 0.0;
        self.frame = 0;
        debug!(variant = %self.integrator.variant(), "cloth solver reset");
    }

    pub fn variant(&self) -> Variant {
        self.integrator.variant()
    }

    pub fn grid(&self) -> &ParticleGrid {
        self.integrator.grid()
    }

    pub fn mesh(&self) -> &ClothMesh {
        &self.mesh
    }

    pub fn obstacle(&self) -> Option<&SphereObstacle> {
        self.obstacle.as_ref()
    }

    /// Simulated seconds since construction or the last reset.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// The tuned configuration for each scheme.
pub fn preset(variant: Variant) -> ClothConfig {
    match variant {
        Variant::ExplicitEuler => ClothConfig::explicit_euler(),
        Variant::ImplicitEuler => ClothConfig::implicit_euler(),
        Variant::PositionBased => ClothConfig::position_based(),
        Variant::FastProjection => ClothConfig::fast_projection(),
    }
}
