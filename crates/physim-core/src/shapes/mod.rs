/// Signed distance primitives and scene objects built on them.
///
/// `primitives` holds the raw distance functions, `dispatcher` the closed
/// shape enum that selects among them.
pub mod dispatcher;
pub mod primitives;

pub use dispatcher::{Material, SceneObject, Shape, Transform};
