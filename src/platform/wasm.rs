//! Browser bindings
//!
//! The page owns the canvas, the animation loop and audio playback. It calls
//! `tick` from `requestAnimationFrame` and draws whatever comes back. Rich
//! values cross the boundary as JSON strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::settings::SessionConfig;
use crate::sim::input::{InputEvent, Key};
use crate::sim::tick::Simulation;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already installed by an earlier module instance
        return;
    }
    log::info!("Nuvecielas core loaded");
}

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(to_js)
}

/// Profile ids in menu order
#[wasm_bindgen(js_name = profileIds)]
pub fn profile_ids() -> js_sys::Array {
    super::profile_catalog()
        .into_iter()
        .map(|p| JsValue::from_str(&p.id))
        .collect()
}

/// Full profile catalog as JSON
#[wasm_bindgen(js_name = profileCatalog)]
pub fn profile_catalog() -> Result<String, JsValue> {
    to_json(&super::profile_catalog())
}

#[wasm_bindgen]
pub struct WasmGame {
    sim: Simulation,
}

#[wasm_bindgen]
impl WasmGame {
    /// Optional tuning JSON; missing fields take their defaults
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<WasmGame, JsValue> {
        let tuning = match tuning_json.as_deref() {
            Some(json) => Tuning::from_json(json).map_err(to_js)?,
            None => Tuning::default(),
        };
        let sim = Simulation::new(tuning).map_err(to_js)?;
        Ok(WasmGame { sim })
    }

    /// Start from a `SessionConfig` JSON object
    pub fn start(&mut self, config_json: &str) -> Result<(), JsValue> {
        let config: SessionConfig = serde_json::from_str(config_json).map_err(to_js)?;
        self.sim.start(config).map_err(to_js)
    }

    /// Advance one animation frame; returns the `FrameResult` JSON
    /// (HUD, entities, particles, events and sound cues)
    pub fn tick(&mut self, timestamp_ms: f64) -> Result<String, JsValue> {
        let frame = self.sim.tick(timestamp_ms);
        to_json(&frame)
    }

    /// Pointer in logical playfield units
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.sim.handle_input(InputEvent::PointerDown { x, y });
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.sim.handle_input(InputEvent::PointerMove { x, y });
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.sim.handle_input(InputEvent::PointerUp);
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self) {
        self.sim.handle_input(InputEvent::PointerCancel);
    }

    /// DOM key name; returns false for keys the game ignores
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        match Key::from_dom(key) {
            Some(key) => {
                self.sim.handle_input(InputEvent::KeyDown { key });
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str) -> bool {
        match Key::from_dom(key) {
            Some(key) => {
                self.sim.handle_input(InputEvent::KeyUp { key });
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_json(&self.sim.snapshot())
    }

    pub fn pause(&mut self) -> bool {
        self.sim.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.sim.resume()
    }

    pub fn reset(&mut self) {
        self.sim.reset();
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.sim.restart().map_err(to_js)
    }

    #[wasm_bindgen(js_name = undoWord)]
    pub fn undo_word(&mut self) -> bool {
        self.sim.undo_word()
    }

    #[wasm_bindgen(js_name = clearStory)]
    pub fn clear_story(&mut self) {
        self.sim.clear_story();
    }
}
