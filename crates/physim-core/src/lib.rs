//! Grid cloth solvers and a signed-distance ray marcher.
//!
//! The cloth side simulates an `n×n` particle lattice under four integration
//! schemes sharing one grid layout, one neighbor stencil and one analytic
//! sphere obstacle. The tracer side sphere-traces a small list of SDF
//! primitives. Both expose flat buffers ready for an external renderer.

pub mod anchors;
pub mod config;
pub mod constraints;
pub mod error;
pub mod forces;
pub mod integrators;
pub mod math;
pub mod mesh;
pub mod particle;
pub mod shapes;
pub mod solver;
pub mod stencil;
pub mod tracer;

pub use config::{ClothConfig, RenderConfig};
pub use error::SimError;
pub use integrators::{FrameStats, Integrator, Variant};
pub use solver::ClothSolver;
