//! Flat triangle-mesh buffers for the external renderer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::particle::ParticleGrid;

/// Uniform cloth color.
pub const CLOTH_COLOR: [f32; 3] = [0.0, 0.5, 0.5];

/// GPU-compatible vertex: 32 bytes, position and color each padded to 16.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub _pad1: f32,
}

/// Two CCW triangles per lattice cell, `6·(n−1)²` indices:
/// `(i,j),(i+1,j),(i,j+1)` and `(i+1,j+1),(i,j+1),(i+1,j)`.
pub fn triangulate(n: usize) -> Vec<u32> {
    if n < 2 {
        return Vec::new();
    }
    let mut indices = Vec::with_capacity(6 * (n - 1) * (n - 1));
    let idx = |i: usize, j: usize| (i * n + j) as u32;
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            indices.extend_from_slice(&[
                idx(i, j),
                idx(i + 1, j),
                idx(i, j + 1),
                idx(i + 1, j + 1),
                idx(i, j + 1),
                idx(i + 1, j),
            ]);
        }
    }
    indices
}

/// Vertex, index and color buffers for one cloth grid.
///
/// Indices and colors are fixed at construction; vertices are refreshed
/// from the grid once per frame.
pub struct ClothMesh {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub colors: Vec<[f32; 3]>,
}

impl ClothMesh {
    pub fn new(grid: &ParticleGrid) -> Self {
        let mut mesh = Self {
            vertices: vec![[0.0; 3]; grid.count()],
            indices: triangulate(grid.n),
            colors: vec![CLOTH_COLOR; grid.count()],
        };
        mesh.update(grid);
        mesh
    }

    /// Copy positions into the vertex buffer, vertex `i·n + j` for `(i, j)`.
    pub fn update(&mut self, grid: &ParticleGrid) {
        for (dst, src) in self.vertices.iter_mut().zip(&grid.position) {
            *dst = src.to_array();
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaved upload buffer.
    pub fn gpu_vertices(&self) -> Vec<GpuVertex> {
        self.vertices
            .iter()
            .zip(&self.colors)
            .map(|(p, c)| GpuVertex {
                position: *p,
                color: *c,
                ..GpuVertex::default()
            })
            .collect()
    }

    /// Area of triangle `t` (for degeneracy checks).
    pub fn triangle_area(&self, t: usize) -> f32 {
        let [a, b, c] =
            [0, 1, 2].map(|k| Vec3::from(self.vertices[self.indices[3 * t + k] as usize]));
        0.5 * (b - a).cross(c - a).length()
    }
}
