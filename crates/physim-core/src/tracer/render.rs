use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::RenderConfig;
use crate::error::SimError;
use crate::math::mix_seed;
use crate::tracer::camera::{Camera, CameraKey};
use crate::tracer::scene::Scene;

/// Dense RGB image, pixel `(i, j)` at `j * width + i`, `j = 0` the bottom row.
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Vec3>,
}

impl ImageBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; width * height],
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Vec3 {
        self.pixels[j * self.width + i]
    }

    /// Pixels as a flat `[r, g, b, r, g, b, ...]` slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Renders a scene through a camera into an [`ImageBuffer`].
pub struct Renderer {
    pub camera: Camera,
    pub scene: Scene,
    config: RenderConfig,
    image: ImageBuffer,
    frame: u64,
}

impl Renderer {
    pub fn new(camera: Camera, scene: Scene, config: RenderConfig) -> Result<Self, SimError> {
        config.validate()?;
        camera.validate()?;
        debug!(
            width = config.width,
            height = config.height,
            objects = scene.objects.len(),
            "renderer created"
        );
        Ok(Self {
            camera,
            scene,
            image: ImageBuffer::new(config.width, config.height),
            config,
            frame: 0,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    /// Forward held keys to the camera (first match wins).
    pub fn handle_keys(&mut self, held: &[CameraKey]) -> Option<CameraKey> {
        self.camera.apply_keys(held)
    }

    /// Shade one pixel. Returns its color and whether the ray hit.
    pub fn shade_pixel(&self, i: usize, j: usize, rng: &mut fastrand::Rng) -> (Vec3, bool) {
        let u = i as f32 / self.config.width as f32;
        let v = j as f32 / self.config.height as f32;
        let record = self.camera.get_ray(u, v, rng).raycast(&self.scene);
        (record.shade(self.config.background), record.hit)
    }

    /// Render a full frame. Returns the number of pixels that hit geometry.
    pub fn render(&mut self) -> usize {
        let width = self.config.width;
        let seed = mix_seed(self.config.seed, self.frame);
        let mut pixels = std::mem::take(&mut self.image.pixels);

        let render_row = |(j, row): (usize, &mut [Vec3])| -> usize {
            let mut rng = fastrand::Rng::with_seed(mix_seed(seed, j as u64));
            let mut hits = 0;
            for (i, pixel) in row.iter_mut().enumerate() {
                let (color, hit) = self.shade_pixel(i, j, &mut rng);
                *pixel = color;
                hits += usize::from(hit);
            }
            hits
        };

        #[cfg(feature = "parallel")]
        let hits: usize = pixels.par_chunks_mut(width).enumerate().map(render_row).sum();

        #[cfg(not(feature = "parallel"))]
        let hits: usize = pixels.chunks_mut(width).enumerate().map(render_row).sum();

        self.image.pixels = pixels;
        self.frame += 1;
        trace!(frame = self.frame, hits, "ray march frame");
        hits
    }
}
