use glam::Vec3;

/// SoA storage for an `n×n` cloth lattice.
///
/// Particle `(row, col)` lives at flat index `row * n + col`. The layout is
/// fixed at construction; stepping only rewrites values.
#[derive(Clone, Debug)]
pub struct ParticleGrid {
    pub n: usize,
    /// Distance between lattice neighbors at rest.
    pub spacing: f32,
    pub grid_length: f32,
    pub height: f32,
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
}

impl ParticleGrid {
    /// Allocate a grid and place it on the rest lattice.
    pub fn new(n: usize, grid_length: f32, height: f32) -> Self {
        let count = n * n;
        let mut grid = Self {
            n,
            spacing: grid_length / n as f32,
            grid_length,
            height,
            position: vec![Vec3::ZERO; count],
            velocity: vec![Vec3::ZERO; count],
        };
        grid.init();
        grid
    }

    /// Reset every particle to the rest lattice with zero velocity.
    pub fn init(&mut self) {
        for row in 0..self.n {
            for col in 0..self.n {
                let idx = self.index(row, col);
                self.position[idx] = self.lattice_position(row, col);
                self.velocity[idx] = Vec3::ZERO;
            }
        }
    }

    /// Closed-form rest position `(row·h − L/2, height, col·h − L/2)`.
    #[inline]
    pub fn lattice_position(&self, row: usize, col: usize) -> Vec3 {
        let half = 0.5 * self.grid_length;
        Vec3::new(
            row as f32 * self.spacing - half,
            self.height,
            col as f32 * self.spacing - half,
        )
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.n + col
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.n * self.n
    }

    /// `½·m·Σ‖v‖²` over the whole grid.
    pub fn kinetic_energy(&self, mass: f32) -> f32 {
        0.5 * mass * self.velocity.iter().map(|v| v.length_squared()).sum::<f32>()
    }
}
