use glam::Vec3;
use physim_core::anchors::Anchors;
use physim_core::particle::ParticleGrid;
use physim_core::stencil::{neighbors, BENDING_STENCIL, SPRING_STENCIL};

#[test]
fn test_init_matches_lattice_formula() {
    for n in 2..12 {
        let grid_length = 2.0;
        let grid = ParticleGrid::new(n, grid_length, 0.8);
        let h = grid_length / n as f32;
        for i in 0..n {
            for j in 0..n {
                let p = grid.position[i * n + j];
                let expected = Vec3::new(i as f32 * h - 1.0, 0.8, j as f32 * h - 1.0);
                assert!(
                    (p - expected).length() < 1e-6,
                    "n={n} particle ({i},{j}) at {p:?}, expected {expected:?}"
                );
                assert_eq!(grid.velocity[i * n + j], Vec3::ZERO);
            }
        }
    }
}

#[test]
fn test_init_resets_mutated_grid() {
    let mut grid = ParticleGrid::new(6, 2.0, 0.8);
    for (x, v) in grid.position.iter_mut().zip(grid.velocity.iter_mut()) {
        *x += Vec3::new(0.1, -0.3, 0.2);
        *v = Vec3::ONE;
    }
    grid.init();
    for row in 0..6 {
        for col in 0..6 {
            let idx = grid.index(row, col);
            assert_eq!(grid.position[idx], grid.lattice_position(row, col));
            assert_eq!(grid.velocity[idx], Vec3::ZERO);
        }
    }
}

#[test]
fn test_neighbor_counts_over_grid() {
    let n = 6;
    let mut spring_total = 0;
    let mut bending_total = 0;
    for row in 0..n {
        for col in 0..n {
            spring_total += neighbors(row, col, n, 1.0, &SPRING_STENCIL).count();
            bending_total += neighbors(row, col, n, 1.0, &BENDING_STENCIL).count();
        }
    }
    // Each undirected link is seen from both ends.
    let axis_links = 2 * n * (n - 1);
    let diagonal_links = 2 * (n - 1) * (n - 1);
    let skip_links = 2 * n * (n - 2);
    assert_eq!(spring_total, 2 * (axis_links + diagonal_links));
    assert_eq!(bending_total, 2 * (axis_links + diagonal_links + skip_links));
}

#[test]
fn test_neighbor_rest_lengths_match_lattice() {
    let grid = ParticleGrid::new(5, 2.0, 0.0);
    for (q, rest) in neighbors(2, 2, grid.n, grid.spacing, &BENDING_STENCIL) {
        let actual = (grid.position[q] - grid.position[grid.index(2, 2)]).length();
        assert!(
            (actual - rest).abs() < 1e-5,
            "neighbor {q}: lattice distance {actual} vs rest length {rest}"
        );
    }
}

#[test]
fn test_anchors_record_initial_corners() {
    let grid = ParticleGrid::new(7, 2.0, 0.8);
    let anchors = Anchors::top_corners(&grid);
    let pinned: Vec<(usize, Vec3)> = anchors.iter().collect();
    assert_eq!(pinned.len(), 2);
    assert_eq!(pinned[0], (0, grid.lattice_position(0, 0)));
    assert_eq!(pinned[1], (grid.index(6, 0), grid.lattice_position(6, 0)));
}
