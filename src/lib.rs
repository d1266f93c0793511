use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, HtmlCanvasElement};

pub mod animation;
pub mod assets;
pub mod camera;
pub mod config;
pub mod distribution;
pub mod error;
pub mod interaction;
pub mod math;
pub mod mesh;
pub mod ornaments;
pub mod render;
pub mod scene;

pub use animation::TreeState;
pub use config::SceneConfig;
pub use scene::TreeScene;

use camera::OrbitCamera;
use interaction::Ray;
use render::RenderPipeline;

/// Install the panic hook and the console logger
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init (e.g. hot reload) keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct ChristmasTree {
    pipeline: RenderPipeline,
    scene: TreeScene,
    camera: OrbitCamera,
    width: i32,
    height: i32,
}

#[wasm_bindgen]
impl ChristmasTree {
    /// Create the default scene on `canvas`
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ChristmasTree, JsValue> {
        Self::build(canvas, SceneConfig::default())
    }

    /// Create a scene from a YAML configuration
    #[wasm_bindgen]
    pub fn with_config(canvas: HtmlCanvasElement, yaml: &str) -> Result<ChristmasTree, JsValue> {
        let config = SceneConfig::from_yaml(yaml).map_err(to_js)?;
        Self::build(canvas, config)
    }

    fn build(canvas: HtmlCanvasElement, config: SceneConfig) -> Result<ChristmasTree, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let pipeline = RenderPipeline::new(gl, width, height)
            .map_err(|e| JsValue::from_str(&e))?;
        let scene = TreeScene::new(&config).map_err(to_js)?;

        Ok(Self {
            pipeline,
            scene,
            camera: OrbitCamera::default(),
            width,
            height,
        })
    }

    /// Advance by `dt` seconds and draw a frame
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        self.pipeline.camera_position = self.camera.position();
        self.pipeline.camera_target = self.camera.target;

        if let Err(e) = self.pipeline.sync_photos(self.scene.photo_store_mut()) {
            log::warn!("photo upload failed: {}", e);
        }

        let snapshot = self.scene.tick(dt, &self.camera.pose());
        self.pipeline.render(snapshot);
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), JsValue> {
        self.width = width;
        self.height = height;
        self.pipeline.resize(width, height)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Handle a click at canvas pixel coordinates. Returns true if anything was hit.
    #[wasm_bindgen]
    pub fn on_click(&mut self, x: f32, y: f32) -> bool {
        self.pipeline.camera_position = self.camera.position();
        self.pipeline.camera_target = self.camera.target;

        let ray = Ray::from_screen(
            x,
            y,
            self.width.max(1) as f32,
            self.height.max(1) as f32,
            &self.pipeline.view_matrix(),
            &self.pipeline.projection_matrix(),
            self.camera.position(),
        );
        self.scene.click(&ray).is_some()
    }

    /// Orbit camera
    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.camera.orbit(delta_x, delta_y);
    }

    /// Zoom camera
    #[wasm_bindgen]
    pub fn zoom(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    /// Flip between chaos and formed. Returns true if now heading to formed.
    #[wasm_bindgen]
    pub fn toggle(&mut self) -> bool {
        self.scene.toggle() == TreeState::Formed
    }

    #[wasm_bindgen]
    pub fn is_formed(&self) -> bool {
        self.scene.is_formed()
    }

    /// Current progress (0.0 = chaos, 1.0 = formed)
    #[wasm_bindgen]
    pub fn get_progress(&self) -> f32 {
        self.scene.progress()
    }

    #[wasm_bindgen]
    pub fn active_photo(&self) -> Option<u32> {
        self.scene.active_photo().map(|id| id as u32)
    }

    #[wasm_bindgen]
    pub fn photo_count(&self) -> u32 {
        self.scene.photo_store().len() as u32
    }

    /// Path the host should fetch for photo `id`
    #[wasm_bindgen]
    pub fn photo_url(&self, id: u32) -> Option<String> {
        self.scene.photo_store().url(id as usize).map(str::to_string)
    }

    /// Caption for photo `id`, set when its file could not be loaded
    #[wasm_bindgen]
    pub fn photo_label(&self, id: u32) -> Option<String> {
        self.scene.photo_store().label(id as usize).map(str::to_string)
    }

    /// Decoded RGBA8 pixels for photo `id`
    #[wasm_bindgen]
    pub fn on_photo_loaded(&mut self, id: u32, rgba: Vec<u8>, width: u32, height: u32) {
        self.scene.photo_store_mut().loaded(id as usize, rgba, width, height);
    }

    /// The host could not fetch photo `id`
    #[wasm_bindgen]
    pub fn on_photo_failed(&mut self, id: u32, reason: &str) {
        self.scene.photo_store_mut().fetch_failed(id as usize, reason);
    }

    /// The host fetched photo `id` but could not decode it
    #[wasm_bindgen]
    pub fn on_photo_decode_failed(&mut self, id: u32, reason: &str) {
        self.scene.photo_store_mut().decode_failed(id as usize, reason);
    }
}
