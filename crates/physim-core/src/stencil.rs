//! Fixed neighbor offsets shared by every particle of the lattice.

use glam::Vec2;

/// A relative `(row, col)` lattice offset.
pub type Offset = (i32, i32);

/// 4-connected plus diagonal neighbors.
pub const SPRING_STENCIL: [Offset; 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

/// `SPRING_STENCIL` plus the skip-one axis neighbors that resist bending.
pub const BENDING_STENCIL: [Offset; 12] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (0, 2),
    (0, -2),
    (2, 0),
    (-2, 0),
];

/// Undeformed distance between two particles `offset` apart.
#[inline]
pub fn rest_length(offset: Offset, spacing: f32) -> f32 {
    Vec2::new(offset.0 as f32, offset.1 as f32).length() * spacing
}

/// In-bounds neighbors of `(row, col)` as `(flat_index, rest_length)`.
///
/// Offsets landing outside the `n×n` lattice are skipped, so boundary
/// particles simply see fewer neighbors.
pub fn neighbors<'a>(
    row: usize,
    col: usize,
    n: usize,
    spacing: f32,
    stencil: &'a [Offset],
) -> impl Iterator<Item = (usize, f32)> + 'a {
    stencil.iter().filter_map(move |&offset| {
        let nrow = row as i64 + offset.0 as i64;
        let ncol = col as i64 + offset.1 as i64;
        if nrow < 0 || ncol < 0 || nrow >= n as i64 || ncol >= n as i64 {
            return None;
        }
        Some((nrow as usize * n + ncol as usize, rest_length(offset, spacing)))
    })
}
