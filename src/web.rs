//! Browser collaborators
//!
//! `DomUi` drives the overlay elements of the host page. `SceneBridge`
//! forwards scene updates to a `window.monsterScene` object the page
//! provides on top of its 3D library:
//!
//! ```text
//! createVisual(handle, shape, bad, color)
//! setPose(handle, x, y, z, sx, sy, sz, rotY, eyeX, eyeZ, eyesClosed, mouth)
//! setColor(handle, color)
//! removeVisual(handle)
//! setCamera(ex, ey, ez, tx, ty, tz)
//! drawConfetti(Float32Array)   // stride 7: x y z rx ry rz color
//! ```

use glam::Vec3;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use crate::platform::{FailureLatch, Renderer, Ui, VisualHandle};
use crate::sim::confetti;
use crate::sim::{Category, ConfettiParticle, MonsterPose, ShapeKind};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = monsterScene, js_name = createVisual)]
    fn scene_create_visual(handle: u32, shape: &str, bad: bool, color: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = monsterScene, js_name = setPose)]
    #[allow(clippy::too_many_arguments)]
    fn scene_set_pose(
        handle: u32,
        x: f32,
        y: f32,
        z: f32,
        sx: f32,
        sy: f32,
        sz: f32,
        rot_y: f32,
        eye_x: f32,
        eye_z: f32,
        eyes_closed: bool,
        mouth: f32,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = monsterScene, js_name = setColor)]
    fn scene_set_color(handle: u32, color: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = monsterScene, js_name = removeVisual)]
    fn scene_remove_visual(handle: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = monsterScene, js_name = setCamera)]
    fn scene_set_camera(ex: f32, ey: f32, ez: f32, tx: f32, ty: f32, tz: f32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = monsterScene, js_name = drawConfetti)]
    fn scene_draw_confetti(data: &js_sys::Float32Array) -> Result<(), JsValue>;
}

/// Renderer backed by the host page's scene
#[derive(Debug, Default)]
pub struct SceneBridge {
    /// `window.monsterScene` exists
    available: bool,
    failures: FailureLatch,
    /// Last confetti count sent, so an empty layer is only cleared once
    last_confetti: usize,
}

impl SceneBridge {
    pub fn new() -> Self {
        let available = js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("monsterScene"))
            .unwrap_or(false);
        if !available {
            log::error!("window.monsterScene is not defined - nothing will be drawn");
        }
        Self {
            available,
            ..Self::default()
        }
    }

    fn call(&mut self, what: &str, f: impl FnOnce() -> Result<(), JsValue>) {
        if self.available {
            self.failures.record(what, f());
        }
    }
}

impl Renderer for SceneBridge {
    fn create_visual(&mut self, handle: VisualHandle, shape: ShapeKind, category: Category, color: u32) {
        self.call("createVisual", || {
            scene_create_visual(handle.0, shape.as_str(), category == Category::Bad, color)
        });
    }

    fn set_pose(&mut self, handle: VisualHandle, pose: &MonsterPose) {
        self.call("setPose", || {
            scene_set_pose(
                handle.0,
                pose.position.x,
                pose.position.y,
                pose.position.z,
                pose.scale.x,
                pose.scale.y,
                pose.scale.z,
                pose.rotation_y,
                pose.eye_offset.x,
                pose.eye_offset.y,
                pose.eyes_closed,
                pose.mouth_stretch,
            )
        });
    }

    fn set_color(&mut self, handle: VisualHandle, color: u32) {
        self.call("setColor", || scene_set_color(handle.0, color));
    }

    fn remove(&mut self, handle: VisualHandle) {
        self.call("removeVisual", || scene_remove_visual(handle.0));
    }

    fn set_camera(&mut self, eye: Vec3, target: Vec3) {
        self.call("setCamera", || {
            scene_set_camera(eye.x, eye.y, eye.z, target.x, target.y, target.z)
        });
    }

    fn draw_confetti(&mut self, particles: &[ConfettiParticle]) {
        if particles.is_empty() && self.last_confetti == 0 {
            return;
        }
        self.last_confetti = particles.len();
        let buf = confetti::pack(particles);
        self.call("drawConfetti", || {
            scene_draw_confetti(&js_sys::Float32Array::from(&buf[..]))
        });
    }
}

/// Overlay screens and score label
pub struct DomUi {
    document: Option<Document>,
}

impl Default for DomUi {
    fn default() -> Self {
        Self::new()
    }
}

impl DomUi {
    pub fn new() -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        if document.is_none() {
            log::warn!("No document - UI disabled");
        }
        Self { document }
    }

    fn element(&self, id: &str) -> Option<HtmlElement> {
        let el = self.document.as_ref()?.get_element_by_id(id)?;
        match el.dyn_into::<HtmlElement>() {
            Ok(el) => Some(el),
            Err(_) => {
                log::warn!("#{} is not an HTML element", id);
                None
            }
        }
    }

    fn set_display(&self, id: &str, display: &str) {
        if let Some(el) = self.element(id) {
            let _ = el.style().set_property("display", display);
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }
}

impl Ui for DomUi {
    fn show_start_screen(&mut self) {
        self.set_display("loading", "none");
        self.set_display("start-screen", "flex");
    }

    fn hide_start_screen(&mut self) {
        self.set_display("start-screen", "none");
    }

    fn show_game_over(&mut self, score: u32) {
        self.set_text("final-score", &score.to_string());
        self.set_display("game-over", "flex");
    }

    fn hide_game_over(&mut self) {
        self.set_display("game-over", "none");
    }

    fn update_score(&mut self, score: u32) {
        self.set_text("score", &format!("Score: {}", score));
    }
}

/// Fresh session seed from the browser's CSPRNG, clock as a fallback
pub fn session_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::fill(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(e) => {
            log::warn!("getrandom failed ({}), seeding from clock", e);
            js_sys::Date::now() as u64
        }
    }
}
