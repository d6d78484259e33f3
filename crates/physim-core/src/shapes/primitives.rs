//! Signed distance functions. Negative inside, zero on the surface.

use glam::Vec3;

/// Sphere of `radius` centered at `center`: `‖p − c‖ − r`.
#[inline]
pub fn sd_sphere(p: Vec3, center: Vec3, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Axis-aligned cube of `half_extent` centered at `center`.
///
/// With `q = |p − c| − h`: `‖max(q, 0)‖ + min(max(q.x, q.y, q.z), 0)`.
#[inline]
pub fn sd_box(p: Vec3, center: Vec3, half_extent: f32) -> f32 {
    let q = (p - center).abs() - Vec3::splat(half_extent);
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}
