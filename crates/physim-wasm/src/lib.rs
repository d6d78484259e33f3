use physim_core::mesh::GpuVertex;
use physim_core::tracer::{Camera, CameraKey, Renderer, Scene};
use physim_core::{ClothSolver, RenderConfig, Variant};
use wasm_bindgen::prelude::*;

/// Route `tracing` events from the simulation to the browser console and
/// report panics there. Per-frame `trace` events stay filtered out.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(tracing::Level::DEBUG)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);
}

/// One cloth simulation with GPU-ready vertex buffers.
#[wasm_bindgen]
pub struct ClothWorld {
    solver: ClothSolver,
    gpu_buffer: Vec<GpuVertex>,
}

#[wasm_bindgen]
impl ClothWorld {
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str) -> Result<ClothWorld, JsValue> {
        let variant: Variant = variant.parse().map_err(to_js_error)?;
        let solver = ClothSolver::with_preset(variant).map_err(to_js_error)?;
        web_sys::console::log_1(
            &format!(
                "WASM ClothWorld created: {} cloth, {} vertices",
                variant,
                solver.mesh().vertices.len()
            )
            .into(),
        );

        let mut world = ClothWorld {
            gpu_buffer: solver.mesh().gpu_vertices(),
            solver,
        };
        world.write_gpu_output();
        Ok(world)
    }

    /// Advance one frame. Returns the wall time spent in milliseconds.
    #[wasm_bindgen]
    pub fn step(&mut self) -> f32 {
        let start = js_sys::Date::now();
        self.solver.step();
        self.write_gpu_output();
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.solver.reset();
        self.write_gpu_output();
    }

    #[wasm_bindgen]
    pub fn variant(&self) -> String {
        self.solver.variant().to_string()
    }

    #[wasm_bindgen]
    pub fn vertex_count(&self) -> usize {
        self.solver.mesh().vertices.len()
    }

    #[wasm_bindgen]
    pub fn get_vertex_ptr(&self) -> *const f32 {
        self.solver.mesh().vertices.as_ptr() as *const f32
    }

    /// Length in floats, three per vertex.
    #[wasm_bindgen]
    pub fn get_vertex_len(&self) -> usize {
        self.solver.mesh().vertices.len() * 3
    }

    #[wasm_bindgen]
    pub fn get_index_ptr(&self) -> *const u32 {
        self.solver.mesh().indices.as_ptr()
    }

    #[wasm_bindgen]
    pub fn get_index_len(&self) -> usize {
        self.solver.mesh().indices.len()
    }

    #[wasm_bindgen]
    pub fn get_color_ptr(&self) -> *const f32 {
        self.solver.mesh().colors.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_color_len(&self) -> usize {
        self.solver.mesh().colors.len() * 3
    }

    /// Interleaved position/color buffer, 32 bytes per vertex.
    #[wasm_bindgen]
    pub fn get_gpu_buffer_ptr(&self) -> *const f32 {
        self.gpu_buffer.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_byte_length(&self) -> usize {
        self.gpu_buffer.len() * std::mem::size_of::<GpuVertex>()
    }

    /// Obstacle radius, or 0 when the scene has none.
    #[wasm_bindgen]
    pub fn sphere_radius(&self) -> f32 {
        self.solver.obstacle().map_or(0.0, |o| o.radius)
    }

    #[wasm_bindgen]
    pub fn sphere_center(&self) -> Vec<f32> {
        self.solver
            .obstacle()
            .map_or_else(Vec::new, |o| o.center.to_array().to_vec())
    }

    #[wasm_bindgen]
    pub fn simulated_time(&self) -> f32 {
        self.solver.time()
    }
}

impl ClothWorld {
    fn write_gpu_output(&mut self) {
        let mesh = self.solver.mesh();
        for (dst, src) in self.gpu_buffer.iter_mut().zip(&mesh.vertices) {
            dst.position = *src;
        }
    }
}

/// Interactive ray-marched view of the base SDF scene.
#[wasm_bindgen]
pub struct RayMarchView {
    renderer: Renderer,
    held: Vec<CameraKey>,
    rgba: Vec<u8>,
}

#[wasm_bindgen]
impl RayMarchView {
    #[wasm_bindgen(constructor)]
    pub fn new(width: usize, height: usize) -> Result<RayMarchView, JsValue> {
        let config = RenderConfig {
            width,
            height,
            seed: random_seed(),
            ..RenderConfig::default()
        };
        let camera = Camera {
            aspect_ratio: config.aspect_ratio(),
            ..Camera::default()
        };
        let renderer = Renderer::new(camera, Scene::base(), config).map_err(to_js_error)?;
        web_sys::console::log_1(&format!("WASM RayMarchView created: {}x{}", width, height).into());

        Ok(RayMarchView {
            renderer,
            held: Vec::new(),
            rgba: vec![0; width * height * 4],
        })
    }

    /// Mark a camera key as held. Unknown keys are ignored.
    #[wasm_bindgen]
    pub fn press_key(&mut self, key: &str) {
        if let Some(key) = key.chars().next().and_then(CameraKey::from_char) {
            if !self.held.contains(&key) {
                self.held.push(key);
            }
        }
    }

    #[wasm_bindgen]
    pub fn release_key(&mut self, key: &str) {
        if let Some(key) = key.chars().next().and_then(CameraKey::from_char) {
            self.held.retain(|k| *k != key);
        }
    }

    /// Move the camera for the held keys and render one frame.
    /// Returns the wall time spent in milliseconds.
    #[wasm_bindgen]
    pub fn render(&mut self) -> f32 {
        let start = js_sys::Date::now();
        self.renderer.handle_keys(&self.held);
        self.renderer.render();
        self.write_rgba();
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    #[wasm_bindgen]
    pub fn get_pixel_ptr(&self) -> *const u8 {
        self.rgba.as_ptr()
    }

    #[wasm_bindgen]
    pub fn get_pixel_byte_length(&self) -> usize {
        self.rgba.len()
    }

    /// Linear float pixels, three per pixel, bottom row first.
    #[wasm_bindgen]
    pub fn get_float_pixels(&self) -> Vec<f32> {
        self.renderer.image().as_floats().to_vec()
    }

    #[wasm_bindgen]
    pub fn camera_position(&self) -> Vec<f32> {
        self.renderer.camera.position.to_array().to_vec()
    }
}

impl RayMarchView {
    /// Canvas RGBA8, top row first.
    fn write_rgba(&mut self) {
        let image = self.renderer.image();
        let width = image.width;
        for (row, dst) in self.rgba.chunks_exact_mut(width * 4).enumerate() {
            let j = image.height - 1 - row;
            for (i, px) in dst.chunks_exact_mut(4).enumerate() {
                let c = image.get(i, j).clamp(glam::Vec3::ZERO, glam::Vec3::ONE) * 255.0;
                px.copy_from_slice(&[c.x as u8, c.y as u8, c.z as u8, 255]);
            }
        }
    }
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn random_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => bytemuck::cast(bytes),
        Err(e) => {
            web_sys::console::warn_1(&format!("getrandom failed ({e}), using a fixed seed").into());
            0
        }
    }
}
