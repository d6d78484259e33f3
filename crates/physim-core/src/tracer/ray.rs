use glam::{Vec3, Vec4};

use crate::shapes::SceneObject;
use crate::tracer::scene::Scene;

/// Distance below which the march counts as a surface hit.
pub const PRECISION: f32 = 1e-4;
/// Step cap per ray.
pub const MAX_RAYMARCHING: u32 = 512;
/// Parametric distance the march starts from.
pub const MIN_TIME: f32 = 0.1;
/// Parametric distance past which the ray has escaped.
pub const MAX_TIME: f32 = 2000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
    /// RGBA carried along the ray and written by shading.
    pub color: Vec4,
}

/// Result of marching one ray. Holds a copy of the hit object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord {
    pub position: Vec3,
    pub time: f32,
    pub hit: bool,
    pub object: Option<SceneObject>,
    /// March iterations used.
    pub steps: u32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            color: Vec4::ONE,
        }
    }

    #[inline]
    pub fn at(&self, time: f32) -> Vec3 {
        self.origin + self.direction * time
    }

    /// Sphere-trace `scene` from `MIN_TIME`.
    ///
    /// Each step advances by the nearest signed distance. The ray hits once
    /// that distance drops under `PRECISION`, and misses once `time` passes
    /// `MAX_TIME` or `MAX_RAYMARCHING` steps are spent.
    pub fn raycast(&self, scene: &Scene) -> HitRecord {
        let mut record = HitRecord {
            position: self.origin,
            time: MIN_TIME,
            hit: false,
            object: None,
            steps: 0,
        };

        for step in 0..MAX_RAYMARCHING {
            record.position = self.at(record.time);
            record.steps = step + 1;
            let Some((nearest, dist)) = scene.nearest(record.position) else {
                break;
            };
            if dist < PRECISION {
                record.hit = true;
                record.object = Some(*nearest);
                break;
            }
            record.time += dist;
            if record.time > MAX_TIME {
                break;
            }
        }
        record
    }
}

impl HitRecord {
    /// Normal-tinted albedo on a hit, `background` otherwise.
    pub fn shade(&self, background: Vec3) -> Vec3 {
        match (&self.object, self.hit) {
            (Some(object), true) => {
                (Vec3::splat(0.5) + 0.5 * object.normal(self.position)) * object.material.albedo
            }
            _ => background,
        }
    }
}
