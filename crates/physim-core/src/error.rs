use thiserror::Error;

/// Errors raised while validating a simulation or render configuration.
///
/// Numerical degeneracies during stepping (zero-length edges, particles at
/// the obstacle center) are not errors; they resolve to zero contributions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("grid must be at least 2x2, got n = {0}")]
    InvalidGridSize(usize),
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f32),
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),
    #[error("damping must be in [0, 1], got {0}")]
    InvalidDamping(f32),
    #[error("grid length must be positive and finite, got {0}")]
    InvalidGridLength(f32),
    #[error("sphere obstacle radius must be positive and finite, got {0}")]
    InvalidObstacle(f32),
    #[error("invalid camera: {0}")]
    InvalidCamera(&'static str),
    #[error("image resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: usize, height: usize },
    #[error("unknown cloth variant `{0}`")]
    UnknownVariant(String),
}
