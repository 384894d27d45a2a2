//! WASM bindings for the kinematics demos.
//!
//! The browser owns the animation-frame loop; it calls [`KinematicsDemo::tick`]
//! once per frame and paints the returned render commands.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { KinematicsDemo } from 'kinesim';
//!
//! async function main() {
//!     await init();
//!
//!     const demo = new KinematicsDemo('yatay-atis');
//!     demo.start();
//!     function frame() {
//!         const data = JSON.parse(demo.tick());
//!         paint(JSON.parse(demo.render_commands_json()));
//!         if (data.state !== 'stopped') requestAnimationFrame(frame);
//!     }
//!     requestAnimationFrame(frame);
//! }
//! ```

// WASM-bindgen exports don't need #[must_use] - values returned to JS
#![allow(clippy::must_use_candidate)]

use wasm_bindgen::prelude::*;

use crate::engine::Vec2;
use crate::render::render_frame;
use crate::scenario::{catalog, Outcome, PointerEvent, Scenario};

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-exported demo state.
#[wasm_bindgen]
pub struct KinematicsDemo {
    scenario: Scenario,
}

#[wasm_bindgen]
impl KinematicsDemo {
    /// Mount a scenario by id or alias (`free-fall`, `yatay-atis`, ...).
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str) -> Result<KinematicsDemo, JsValue> {
        let config = catalog::preset(name).map_err(to_js)?;
        let scenario = Scenario::new(config).map_err(to_js)?;
        Ok(Self { scenario })
    }

    /// Mount a scenario from a YAML configuration.
    #[wasm_bindgen]
    pub fn from_yaml(yaml: &str) -> Result<KinematicsDemo, JsValue> {
        let config = crate::config::SimulationConfig::from_yaml(yaml).map_err(to_js)?;
        let scenario = Scenario::new(config).map_err(to_js)?;
        Ok(Self { scenario })
    }

    /// Start a run. Returns false if the current state refuses it.
    #[wasm_bindgen]
    pub fn start(&mut self) -> bool {
        self.scenario.start().is_applied()
    }

    /// Stop the current run.
    #[wasm_bindgen]
    pub fn stop(&mut self) -> bool {
        self.scenario.stop().is_applied()
    }

    /// Return to idle with the initial conditions. Always applies.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> bool {
        self.scenario.reset().is_applied()
    }

    /// Enter the initial height (m).
    #[wasm_bindgen]
    pub fn set_height(&mut self, height: f64) -> bool {
        matches!(self.scenario.set_height(height), Outcome::Applied { .. })
    }

    /// Enter the initial horizontal velocity (m/s).
    #[wasm_bindgen]
    pub fn set_velocity(&mut self, velocity_x: f64) -> bool {
        matches!(self.scenario.set_velocity(velocity_x), Outcome::Applied { .. })
    }

    /// Pointer pressed at canvas coordinates.
    #[wasm_bindgen]
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.scenario.pointer(PointerEvent::Down { at: Vec2::new(x, y) });
    }

    /// Pointer moved to canvas coordinates.
    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.scenario.pointer(PointerEvent::Move { at: Vec2::new(x, y) });
    }

    /// Pointer released.
    #[wasm_bindgen]
    pub fn pointer_up(&mut self) {
        self.scenario.pointer(PointerEvent::Up);
    }

    /// Pointer left the canvas.
    #[wasm_bindgen]
    pub fn pointer_leave(&mut self) {
        self.scenario.pointer(PointerEvent::Leave);
    }

    /// Advance one frame and return the data update as JSON.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Result<String, JsValue> {
        let frame = self.scenario.tick();
        serde_json::to_string(&frame.data).map_err(to_js)
    }

    /// Render commands for the current frame as JSON.
    #[wasm_bindgen]
    pub fn render_commands_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&render_frame(&self.scenario.snapshot())).map_err(to_js)
    }

    /// Both chart series as JSON.
    #[wasm_bindgen]
    pub fn charts_json(&self) -> Result<String, JsValue> {
        let samples = self.scenario.samples();
        let charts = (samples.height().to_series(), samples.velocity().to_series());
        serde_json::to_string(&charts).map_err(to_js)
    }

    /// Current run state label.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.scenario.state().label().to_string()
    }

    /// Current scale (px/m).
    #[wasm_bindgen(getter)]
    pub fn pixels_per_meter(&self) -> f64 {
        self.scenario.pixels_per_meter()
    }

    /// Horizontal camera offset (px).
    #[wasm_bindgen(getter)]
    pub fn camera_offset_x(&self) -> f64 {
        self.scenario.camera_offset_x()
    }

    /// Simulated seconds since start.
    #[wasm_bindgen(getter)]
    pub fn elapsed_seconds(&self) -> f64 {
        self.scenario.elapsed().as_secs_f64()
    }
}
