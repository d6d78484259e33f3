use tracing::debug;

use crate::config::ClothConfig;
use crate::constraints::contact::{resolve_sphere_collisions, CollisionModel};
use crate::error::SimError;
use crate::forces::spring::net_spring_force;
use crate::integrators::{advance_positions, per_particle, FrameStats, Integrator, Variant};
use crate::particle::ParticleGrid;
use crate::stencil::SPRING_STENCIL;

/// Forward-Euler mass-spring cloth.
///
/// Stiff springs keep the cloth from stretching, so the scheme is only
/// stable with a small `dt`; a frame is `num_substep` substeps, each
/// followed by an impulse collision pass.
pub struct ExplicitEuler {
    config: ClothConfig,
    grid: ParticleGrid,
}

impl ExplicitEuler {
    pub fn new(config: ClothConfig) -> Result<Self, SimError> {
        config.validate()?;
        let grid = ParticleGrid::new(config.n, config.grid_length, config.height);
        debug!(
            n = config.n,
            dt = config.dt,
            substeps = config.num_substep,
            "explicit euler cloth created"
        );
        Ok(Self { config, grid })
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn grid_mut(&mut self) -> &mut ParticleGrid {
        &mut self.grid
    }

    /// One explicit step followed by collision. Returns the contact count.
    pub fn substep(&mut self) -> usize {
        let ClothConfig {
            dt,
            damping,
            gravity,
            mass,
            spring_k,
            ..
        } = self.config;

        let grid = &self.grid;
        let velocity = per_particle(grid.count(), |p| {
            let springs = net_spring_force(&grid.position, grid, p, &SPRING_STENCIL, spring_k);
            let force = gravity * mass + springs;
            grid.velocity[p] * damping + force * dt / mass
        });
        self.grid.velocity = velocity;
        advance_positions(&mut self.grid.position, &self.grid.velocity, dt);

        match &self.config.obstacle {
            Some(obstacle) => resolve_sphere_collisions(
                obstacle,
                CollisionModel::Impulse {
                    mu_n: self.config.mu_n,
                    mu_t: self.config.mu_t,
                },
                &mut self.grid.position,
                &mut self.grid.velocity,
            ),
            None => 0,
        }
    }
}

impl Integrator for ExplicitEuler {
    fn step_frame(&mut self) -> FrameStats {
        let mut contacts = 0;
        for _ in 0..self.config.num_substep {
            contacts += self.substep();
        }
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
    }

    fn variant(&self) -> Variant {
        Variant::ExplicitEuler
    }

    fn frame_time(&self) -> f32 {
        self.config.dt * self.config.num_substep as f32
    }
}
