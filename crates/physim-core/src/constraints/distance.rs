use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::integrators::per_particle;

/// Conjugate-gradient iteration cap of one global step.
const SOLVE_ITERATIONS: usize = 1000;
/// Relative residual at which the linear solve stops.
const SOLVE_TOLERANCE: f64 = 1e-6;

/// Inextensibility constraints on the forward edges of an `n×n` lattice.
///
/// Particle `(i, j)` owns two edges: slot `2·(i·n + j)` to `(i+1, j)` and
/// slot `2·(i·n + j) + 1` to `(i, j+1)`. Slots whose neighbor falls outside
/// the lattice stay at zero.
///
/// For an edge of current vector `d` and rest length `L` the constraint is
/// `C = ‖d‖²/L − L`, zero exactly at rest length, with gradient magnitude
/// `2‖d‖/L` per endpoint.
#[derive(Clone, Debug)]
pub struct EdgeConstraints {
    n: usize,
    rest_length: f32,
    /// Constraint value per edge slot.
    pub constraint: Vec<f32>,
    /// Gradient magnitude per edge slot.
    pub grad_constraint: Vec<f32>,
}

impl EdgeConstraints {
    pub fn new(n: usize, rest_length: f32) -> Self {
        Self {
            n,
            rest_length,
            constraint: vec![0.0; 2 * n * n],
            grad_constraint: vec![0.0; 2 * n * n],
        }
    }

    #[inline]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Flat index of the far endpoint of edge slot `k` (0 = row+1, 1 = col+1)
    /// of particle `(row, col)`, if it exists.
    #[inline]
    fn far_end(&self, row: usize, col: usize, k: usize) -> Option<usize> {
        let (r, c) = if k == 0 { (row + 1, col) } else { (row, col + 1) };
        (r < self.n && c < self.n).then(|| r * self.n + c)
    }

    /// Evaluate every constraint and gradient from `positions`.
    ///
    /// Returns the largest normalized violation `|C| / L`.
    pub fn evaluate(&mut self, positions: &[Vec3]) -> f32 {
        let n = self.n;
        let l = self.rest_length;
        let eval_particle = |p: usize, c: &mut [f32], g: &mut [f32]| {
            let (row, col) = (p / n, p % n);
            for k in 0..2 {
                c[k] = 0.0;
                g[k] = 0.0;
                let (r, cc) = if k == 0 { (row + 1, col) } else { (row, col + 1) };
                if r < n && cc < n {
                    let d = positions[r * n + cc] - positions[p];
                    c[k] = d.length_squared() / l - l;
                    g[k] = 2.0 * d.length() / l;
                }
            }
        };

        #[cfg(feature = "parallel")]
        {
            self.constraint
                .par_chunks_mut(2)
                .zip(self.grad_constraint.par_chunks_mut(2))
                .enumerate()
                .for_each(|(p, (c, g))| eval_particle(p, c, g));
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (p, (c, g)) in self
                .constraint
                .chunks_mut(2)
                .zip(self.grad_constraint.chunks_mut(2))
                .enumerate()
            {
                eval_particle(p, c, g);
            }
        }

        self.max_violation()
    }

    /// Largest `|C| / L` from the last evaluation.
    pub fn max_violation(&self) -> f32 {
        self.constraint
            .iter()
            .fold(0.0_f32, |acc, c| acc.max(c.abs()))
            / self.rest_length
    }

    /// Sum of all constraint values from the last evaluation.
    pub fn total_violation(&self) -> f32 {
        self.constraint.iter().sum()
    }

    /// Scaled edge vectors `(2/L)·d` per slot: the far-endpoint row of the
    /// constraint Jacobian. The near endpoint carries the negation.
    fn jacobian(&self, positions: &[Vec3]) -> Vec<Vec3> {
        let n = self.n;
        let scale = 2.0 / self.rest_length;
        per_particle(2 * n * n, |e| {
            let p = e / 2;
            match self.far_end(p / n, p % n, e % 2) {
                Some(q) => (positions[q] - positions[p]) * scale,
                None => Vec3::ZERO,
            }
        })
    }

    /// `W·Jᵀ·λ`: per-particle displacement for the slot multipliers `lambda`.
    fn weighted_transpose(&self, jacobian: &[Vec3], lambda: &[f32], inv_mass: &[f32]) -> Vec<Vec3> {
        let n = self.n;
        per_particle(n * n, |p| {
            let w_p = inv_mass[p];
            if w_p == 0.0 {
                return Vec3::ZERO;
            }
            let (row, col) = (p / n, p % n);
            let owned = 2 * p;
            let mut sum =
                -(jacobian[owned] * lambda[owned] + jacobian[owned + 1] * lambda[owned + 1]);
            if row > 0 {
                let e = 2 * (p - n);
                sum += jacobian[e] * lambda[e];
            }
            if col > 0 {
                let e = 2 * (p - 1) + 1;
                sum += jacobian[e] * lambda[e];
            }
            sum * w_p
        })
    }

    /// `J·W·Jᵀ·λ`, the system matrix applied without assembling it.
    fn system_product(&self, jacobian: &[Vec3], lambda: &[f32], inv_mass: &[f32]) -> Vec<f32> {
        let n = self.n;
        let moved = self.weighted_transpose(jacobian, lambda, inv_mass);
        per_particle(2 * n * n, |e| {
            let p = e / 2;
            match self.far_end(p / n, p % n, e % 2) {
                Some(q) => jacobian[e].dot(moved[q] - moved[p]),
                None => 0.0,
            }
        })
    }

    /// One global projection step using the last evaluated constraints.
    ///
    /// Linearizing every edge at once gives `(J·W·Jᵀ)·δλ = C`, solved by
    /// conjugate gradients, and the positions move by `−W·Jᵀ·δλ`. `W` holds
    /// the inverse masses; zero pins a particle. The step cancels the
    /// first-order violation of every edge together, leaving the quadratic
    /// remainder to the caller's next evaluation.
    pub fn project(&self, positions: &mut [Vec3], inv_mass: &[f32]) {
        let jacobian = self.jacobian(positions);

        let mut lambda = vec![0.0_f32; self.constraint.len()];
        let mut residual = self.constraint.clone();
        let mut direction = residual.clone();
        let mut rs = dot(&residual, &residual);
        let target = rs.sqrt() * SOLVE_TOLERANCE;

        for _ in 0..SOLVE_ITERATIONS {
            if rs.sqrt() <= target {
                break;
            }
            let product = self.system_product(&jacobian, &direction, inv_mass);
            let curvature = dot(&direction, &product);
            if curvature <= f64::MIN_POSITIVE {
                break;
            }
            let alpha = (rs / curvature) as f32;
            for (((l, r), d), a) in lambda
                .iter_mut()
                .zip(residual.iter_mut())
                .zip(&direction)
                .zip(&product)
            {
                *l += alpha * d;
                *r -= alpha * a;
            }
            let next = dot(&residual, &residual);
            let beta = (next / rs) as f32;
            for (d, r) in direction.iter_mut().zip(&residual) {
                *d = r + beta * *d;
            }
            rs = next;
        }

        let delta = self.weighted_transpose(&jacobian, &lambda, inv_mass);
        for (x, dx) in positions.iter_mut().zip(delta) {
            *x -= dx;
        }
    }
}

/// Dot product accumulated in double precision.
fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum()
}
