use glam::Vec3;

use crate::particle::ParticleGrid;

/// Grid corners pinned to the positions they had at initialization.
#[derive(Clone, Debug, Default)]
pub struct Anchors {
    pinned: Vec<(usize, Vec3)>,
}

impl Anchors {
    pub fn none() -> Self {
        Self::default()
    }

    /// Pin `(0, 0)` and `(n-1, 0)`, one full edge of the cloth. An empty
    /// grid has no corners.
    pub fn top_corners(grid: &ParticleGrid) -> Self {
        let mut anchors = Self::default();
        if grid.n == 0 {
            return anchors;
        }
        anchors.pin(grid, 0, 0);
        anchors.pin(grid, grid.n - 1, 0);
        anchors
    }

    /// Record the current position of `(row, col)` as its pinned position.
    pub fn pin(&mut self, grid: &ParticleGrid, row: usize, col: usize) {
        let idx = grid.index(row, col);
        self.pinned.retain(|&(i, _)| i != idx);
        self.pinned.push((idx, grid.position[idx]));
    }

    /// Overwrite pinned positions and zero their velocities.
    pub fn apply(&self, position: &mut [Vec3], velocity: &mut [Vec3]) {
        for &(idx, pos) in &self.pinned {
            position[idx] = pos;
            velocity[idx] = Vec3::ZERO;
        }
    }

    pub fn is_pinned(&self, idx: usize) -> bool {
        self.pinned.iter().any(|&(i, _)| i == idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        self.pinned.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pinned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty()
    }
}
