use glam::Vec3;

use crate::shapes::SceneObject;

/// An ordered list of SDF objects.
///
/// Nearest-object queries scan the whole list; scenes are a handful of
/// primitives.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    /// Red sphere at `(0, 0, −1)` beside a green cube at `(1, 0, −1)`.
    pub fn base() -> Self {
        Self::new(vec![
            SceneObject::sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, Vec3::new(1.0, 0.0, 0.0)),
            SceneObject::cube(Vec3::new(1.0, 0.0, -1.0), 0.5, Vec3::new(0.0, 1.0, 0.0)),
        ])
    }

    pub fn push(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// The object with the smallest signed distance to `p`, and that distance.
    /// `None` for an empty scene.
    pub fn nearest(&self, p: Vec3) -> Option<(&SceneObject, f32)> {
        self.objects
            .iter()
            .map(|object| (object, object.signed_distance(p)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
