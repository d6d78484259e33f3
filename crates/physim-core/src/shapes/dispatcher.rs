//! Scene objects and distance dispatch over the closed set of shapes.

use glam::{Quat, Vec3};

use crate::math::direction_and_length;
use crate::shapes::primitives::{sd_box, sd_sphere};

/// Finite-difference step of the normal estimate.
pub const NORMAL_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Cube { half_extent: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub albedo: Vec3,
}

/// Rigid placement. Distance evaluation only reads `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObject {
    pub shape: Shape,
    pub material: Material,
    pub transform: Transform,
}

impl SceneObject {
    pub fn sphere(center: Vec3, radius: f32, albedo: Vec3) -> Self {
        Self {
            shape: Shape::Sphere { radius },
            material: Material { albedo },
            transform: Transform::from_position(center),
        }
    }

    pub fn cube(center: Vec3, half_extent: f32, albedo: Vec3) -> Self {
        Self {
            shape: Shape::Cube { half_extent },
            material: Material { albedo },
            transform: Transform::from_position(center),
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        let center = self.transform.position;
        match self.shape {
            Shape::Sphere { radius } => sd_sphere(p, center, radius),
            Shape::Cube { half_extent } => sd_box(p, center, half_extent),
        }
    }

    /// Surface normal from a four-tap tetrahedral difference of the SDF.
    ///
    /// Works identically for every shape; flat regions of the field give a
    /// zero vector rather than NaN.
    pub fn normal(&self, p: Vec3) -> Vec3 {
        let h = NORMAL_EPSILON;
        let k0 = Vec3::new(1.0, -1.0, -1.0);
        let k1 = Vec3::new(-1.0, -1.0, 1.0);
        let k2 = Vec3::new(-1.0, 1.0, -1.0);
        let k3 = Vec3::new(1.0, 1.0, 1.0);
        let gradient = k0 * self.signed_distance(p + k0 * h)
            + k1 * self.signed_distance(p + k1 * h)
            + k2 * self.signed_distance(p + k2 * h)
            + k3 * self.signed_distance(p + k3 * h);
        direction_and_length(gradient).0
    }
}
