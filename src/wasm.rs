//! WASM bindings for the treerings-core library.
//!
//! Everything exposed to JavaScript via wasm-bindgen is defined here. Trees
//! and configuration cross the boundary as JSON strings; source references
//! cross as plain numbers.

use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

use crate::config::ViewConfig;
use crate::error::Error;
use crate::hierarchy::{NodeIndex, SourceRef};
use crate::output::{ErrorInfo, ViewSnapshot};
use crate::render::CanvasSurface;
use crate::view::RingView;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

fn source_to_js(source: Option<SourceRef>) -> JsValue {
    match source {
        Some(source) => JsValue::from_f64(source.0 as f64),
        None => JsValue::NULL,
    }
}

/// Largest integer a JS number holds exactly (`Number.MAX_SAFE_INTEGER`).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Source references arrive as JS numbers; only non-negative safe integers
/// name a node.
fn source_from_js(value: f64) -> Option<SourceRef> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_SAFE_INTEGER {
        Some(SourceRef(value as u64))
    } else {
        None
    }
}

#[wasm_bindgen]
pub struct RingViewHandle {
    view: RingView,
    last_error: Option<ErrorInfo>,
}

impl RingViewHandle {
    fn report(&mut self, context: &str, err: Error) {
        console_error(&format!("{context}: {err}"));
        self.last_error = Some(ErrorInfo::from(&err));
    }

    fn source_at(&self, node: Option<NodeIndex>) -> Option<f64> {
        let node = self.view.tree().get(node?)?;
        Some(node.source.0 as f64)
    }
}

#[wasm_bindgen]
impl RingViewHandle {
    /// Create a view. An empty string uses the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> RingViewHandle {
        let mut handle = RingViewHandle { view: RingView::default(), last_error: None };
        if !config_json.trim().is_empty() {
            match ViewConfig::from_json(config_json) {
                Ok(config) => handle.view.set_config(config),
                Err(e) => handle.report("Error reading config", e),
            }
        }
        handle
    }

    /// Replace the tree. Returns false (and keeps the current tree) on bad input.
    #[wasm_bindgen(js_name = setTree)]
    pub fn set_tree(&mut self, tree_json: &str) -> bool {
        match self.view.set_tree_json(tree_json) {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                self.report("Error reading tree", e);
                false
            }
        }
    }

    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config_json: &str) -> bool {
        match ViewConfig::from_json(config_json) {
            Ok(config) => {
                self.view.set_config(config);
                true
            }
            Err(e) => {
                self.report("Error reading config", e);
                false
            }
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.view.resize(width, height);
    }

    /// Route a pointer position. Returns the hovered source reference.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<f64> {
        let hit = self.view.pointer_move(x, y);
        self.source_at(hit)
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.view.pointer_leave();
    }

    /// Focus the first node (in pre-order) with the given source reference.
    pub fn click(&mut self, source: f64, now_ms: f64) -> bool {
        let Some(source) = source_from_js(source) else {
            tracing::debug!(source, "ignoring click on invalid source reference");
            return false;
        };
        let Some(node) = self.view.tree().find(source).map(|n| n.index) else {
            return false;
        };
        self.view.click(node, now_ms)
    }

    /// Click at a screen point; outside every circle this zooms back out.
    #[wasm_bindgen(js_name = clickAt)]
    pub fn click_at(&mut self, x: f64, y: f64, now_ms: f64) -> Option<f64> {
        let hit = self.view.click_at(x, y, now_ms);
        self.source_at(hit)
    }

    pub fn reset(&mut self, now_ms: f64) {
        self.view.reset(now_ms);
    }

    /// Advance animations to `now_ms`. Returns true while more frames are needed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.view.tick(now_ms)
    }

    /// Register the hover listener, replacing any previous one. It is called
    /// with a source reference, or `null` when the pointer leaves.
    #[wasm_bindgen(js_name = setHoverListener)]
    pub fn set_hover_listener(&mut self, callback: js_sys::Function) {
        self.view.set_hover_listener(move |source| {
            if let Err(e) = callback.call1(&JsValue::NULL, &source_to_js(source)) {
                console_error(&format!("Hover listener failed: {:?}", e));
            }
        });
    }

    #[wasm_bindgen(js_name = clearHoverListener)]
    pub fn clear_hover_listener(&mut self) {
        self.view.clear_hover_listener();
    }

    #[wasm_bindgen(js_name = renderSvg)]
    pub fn render_svg(&self) -> String {
        self.view.render_svg()
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> String {
        ViewSnapshot::of(&self.view).with_error(self.last_error.clone()).to_json()
    }

    #[wasm_bindgen(js_name = paintCanvas)]
    pub fn paint_canvas(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let mut surface = CanvasSurface::new(ctx);
        self.view.paint(&mut surface);
        match surface.take_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
