/// Sphere obstacle contact resolution.
pub mod contact;
/// Edge inextensibility constraints for fast projection.
pub mod distance;
