//! Sphere-traced rendering of signed distance scenes.

pub mod camera;
pub mod ray;
pub mod render;
pub mod scene;

pub use camera::{Camera, CameraKey};
pub use ray::{HitRecord, Ray, MAX_RAYMARCHING, MAX_TIME, MIN_TIME, PRECISION};
pub use render::{ImageBuffer, Renderer};
pub use scene::Scene;
