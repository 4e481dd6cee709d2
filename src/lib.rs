use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod animation;
pub mod config;
pub mod error;
pub mod instances;
pub mod layout;
pub mod logging;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod state;

pub use config::SceneConfig;
pub use error::{Result, TreeError};
pub use scene::Scene;
pub use state::{AppState, StateUpdate, ThemeColor};

use render::RenderPipeline;
use tracing::{info, warn};

/// Initialize panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init_logging();
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct SignatureTree {
    pipeline: RenderPipeline,
    scene: Scene,
    /// Wall-clock seconds since creation
    time: f64,
}

#[wasm_bindgen]
impl SignatureTree {
    /// Create a new engine instance with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<SignatureTree, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let seed = js_sys::Date::now().to_bits();
        let scene = Scene::new(SceneConfig::default(), AppState::default(), seed).map_err(js_error)?;

        let mut pipeline = RenderPipeline::new(gl, &scene, width, height).map_err(js_error)?;
        if let Some(window) = web_sys::window() {
            pipeline.set_pixel_ratio(window.device_pixel_ratio() as f32);
        }

        info!(width, height, "signature tree created");

        Ok(Self {
            pipeline,
            scene,
            time: 0.0,
        })
    }

    /// Advance the scene by `dt` seconds and draw it
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) -> Result<(), JsValue> {
        self.time = animation::advance_clock(self.time, dt);

        self.scene.update(dt, self.time);
        self.pipeline.render(&mut self.scene, self.time).map_err(js_error)
    }

    /// Apply a partial state update written as a YAML or JSON map,
    /// e.g. `{ is_exploded: true, theme_color: ruby }`
    #[wasm_bindgen]
    pub fn dispatch(&mut self, patch: &str) -> Result<(), JsValue> {
        let update = StateUpdate::from_yaml(patch).map_err(js_error)?;
        self.scene.dispatch(update);
        Ok(())
    }

    /// Replace the scene configuration from YAML. Groups whose layout
    /// inputs are unchanged keep their layouts.
    #[wasm_bindgen]
    pub fn load_config(&mut self, yaml: &str) -> Result<(), JsValue> {
        let config = SceneConfig::from_yaml(yaml).map_err(|e| {
            warn!(error = %e, "rejected configuration");
            js_error(e)
        })?;
        self.scene.apply_config(config).map_err(js_error)
    }

    // === State ===

    #[wasm_bindgen]
    pub fn set_lights_on(&mut self, value: bool) {
        self.scene.dispatch(StateUpdate::lights_on(value));
    }

    #[wasm_bindgen]
    pub fn set_rotation_speed(&mut self, value: f32) {
        self.scene.dispatch(StateUpdate::rotation_speed(value));
    }

    #[wasm_bindgen]
    pub fn set_bloom_intensity(&mut self, value: f32) {
        self.scene.dispatch(StateUpdate::bloom_intensity(value));
    }

    /// Accepts `gold`, `silver` or `ruby`
    #[wasm_bindgen]
    pub fn set_theme_color(&mut self, value: &str) -> Result<(), JsValue> {
        let theme = value.parse::<ThemeColor>().map_err(js_error)?;
        self.scene.dispatch(StateUpdate::theme_color(theme));
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_exploded(&mut self, value: bool) {
        self.scene.dispatch(StateUpdate::exploded(value));
    }

    /// Flip between the assembled tree and the scattered cloud
    #[wasm_bindgen]
    pub fn toggle_exploded(&mut self) -> bool {
        let exploded = !self.scene.state().is_exploded;
        self.scene.dispatch(StateUpdate::exploded(exploded)).is_exploded
    }

    #[wasm_bindgen]
    pub fn lights_on(&self) -> bool {
        self.scene.state().lights_on
    }

    #[wasm_bindgen]
    pub fn rotation_speed(&self) -> f32 {
        self.scene.state().rotation_speed
    }

    #[wasm_bindgen]
    pub fn bloom_intensity(&self) -> f32 {
        self.scene.state().bloom_intensity
    }

    #[wasm_bindgen]
    pub fn theme_color(&self) -> String {
        self.scene.state().theme_color.to_string()
    }

    #[wasm_bindgen]
    pub fn is_exploded(&self) -> bool {
        self.scene.state().is_exploded
    }

    /// Current morph progress, 0 = tree and 1 = scattered
    #[wasm_bindgen]
    pub fn morph_progress(&self) -> f32 {
        self.scene.morph_progress()
    }

    // === Camera ===

    /// Orbit camera by a pointer drag in pixels
    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.scene.camera_mut().orbit(delta_x, delta_y);
    }

    /// Zoom camera
    #[wasm_bindgen]
    pub fn zoom(&mut self, delta: f32) {
        self.scene.camera_mut().zoom(delta);
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), JsValue> {
        self.pipeline.resize(width, height).map_err(js_error)
    }
}
