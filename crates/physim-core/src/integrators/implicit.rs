use glam::Vec3;
use tracing::debug;

use crate::config::ClothConfig;
use crate::constraints::contact::{resolve_sphere_collisions, CollisionModel};
use crate::error::SimError;
use crate::forces::spring::spring_gradient;
use crate::integrators::{damp_and_accelerate, per_particle, FrameStats, Integrator, Variant};
use crate::particle::ParticleGrid;
use crate::stencil::{neighbors, SPRING_STENCIL};

/// Implicit Euler cloth solved by diagonal local-Newton relaxation.
///
/// Each frame predicts `x̂ = x + dt·v` and then runs `num_substep` descent
/// passes on the local energy
/// `(m/dt²)·‖x − x̂‖²/2 − m·g·x + Σ springs`, dividing each particle's
/// gradient by `m/dt² + 4k` in place of the true Hessian. Passes sweep the
/// four lattice colors in turn (Gauss-Seidel); a single simultaneous sweep
/// overshoots once the cloth stretches, because the Hessian's largest
/// eigenvalue approaches `m/dt² + 8k`.
pub struct ImplicitEuler {
    config: ClothConfig,
    grid: ParticleGrid,
    /// Inertial prediction of the current frame.
    pub x_hat: Vec<Vec3>,
    /// Energy gradient of the last relaxation pass, each particle's taken
    /// just before its own color moved.
    pub gradient: Vec<Vec3>,
}

impl ImplicitEuler {
    pub fn new(config: ClothConfig) -> Result<Self, SimError> {
        config.validate()?;
        let grid = ParticleGrid::new(config.n, config.grid_length, config.height);
        let count = grid.count();
        debug!(
            n = config.n,
            dt = config.dt,
            passes = config.num_substep,
            "implicit euler cloth created"
        );
        Ok(Self {
            x_hat: grid.position.clone(),
            gradient: vec![Vec3::ZERO; count],
            config,
            grid,
        })
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn grid_mut(&mut self) -> &mut ParticleGrid {
        &mut self.grid
    }

    /// Damp velocities and set `x = x̂ = x + dt·v`.
    pub fn predict(&mut self) {
        let dt = self.config.dt;
        damp_and_accelerate(&mut self.grid.velocity, self.config.damping, Vec3::ZERO, dt);
        for ((x, x_hat), v) in self
            .grid
            .position
            .iter_mut()
            .zip(self.x_hat.iter_mut())
            .zip(&self.grid.velocity)
        {
            *x_hat = *x + *v * dt;
            *x = *x_hat;
        }
    }

    /// Energy gradient at particle `p` for the current positions.
    fn local_gradient(&self, p: usize) -> Vec3 {
        let ClothConfig {
            mass,
            gravity,
            spring_k,
            ..
        } = self.config;
        let grid = &self.grid;
        let x = &grid.position;
        let (row, col) = (p / grid.n, p % grid.n);
        let springs: Vec3 = neighbors(row, col, grid.n, grid.spacing, &SPRING_STENCIL)
            .map(|(q, rest)| spring_gradient(x[p], x[q], rest, spring_k))
            .sum();
        self.config.t_inverse() * mass * (x[p] - self.x_hat[p]) - gravity * mass + springs
    }

    /// Recompute the energy gradient of every particle at once.
    ///
    /// Each spring enters a particle's gradient once, through the stencil
    /// sum over its own neighbors.
    pub fn compute_gradient(&mut self) {
        let this = &*self;
        let gradient = per_particle(this.grid.count(), |p| this.local_gradient(p));
        self.gradient = gradient;
    }

    /// One relaxation pass: a diagonal descent step per lattice color.
    ///
    /// Within a color no two particles share a spring, so the color's
    /// gradients are evaluated in parallel and applied together; the next
    /// color then sees the moved positions.
    pub fn relax(&mut self) {
        let n = self.grid.n;
        let step = 1.0 / (self.config.t_inverse() * self.config.mass + 4.0 * self.config.spring_k);
        for color in 0..COLORS {
            let this = &*self;
            let gradient = per_particle(this.grid.count(), |p| {
                if lattice_color(p / n, p % n) == color {
                    this.local_gradient(p)
                } else {
                    Vec3::ZERO
                }
            });
            let moved = self.grid.position.iter_mut().zip(self.gradient.iter_mut());
            for (p, ((x, stored), g)) in moved.zip(gradient).enumerate() {
                if lattice_color(p / n, p % n) == color {
                    *x -= g * step;
                    *stored = g;
                }
            }
        }
    }
}

/// Independent particle sets of the 8-neighbor spring stencil.
const COLORS: usize = 4;

/// Color of particle `(row, col)`; 8-neighbors always differ.
#[inline]
fn lattice_color(row: usize, col: usize) -> usize {
    (row % 2) * 2 + col % 2
}

impl Integrator for ImplicitEuler {
    fn step_frame(&mut self) -> FrameStats {
        let dt = self.config.dt;
        let start = self.grid.position.clone();

        self.predict();
        for _ in 0..self.config.num_substep {
            self.relax();
        }

        for ((v, x), x0) in self.grid.velocity.iter_mut().zip(&self.grid.position).zip(&start) {
            *v = (*x - *x0) / dt;
        }

        // Collision runs once per frame here, after relaxation, unlike the
        // per-substep pass of the explicit scheme.
        let contacts = match &self.config.obstacle {
            Some(obstacle) => resolve_sphere_collisions(
                obstacle,
                CollisionModel::Pin { dt },
                &mut self.grid.position,
                &mut self.grid.velocity,
            ),
            None => 0,
        };

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
        self.x_hat.copy_from_slice(&self.grid.position);
        self.gradient.fill(Vec3::ZERO);
    }

    fn variant(&self) -> Variant {
        Variant::ImplicitEuler
    }

    fn frame_time(&self) -> f32 {
        self.config.dt
    }
}
