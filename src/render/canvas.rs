// Canvas 2D backend.
//
// Canvas has no text-on-path, so labels are drawn glyph by glyph: each
// character is rotated onto the upper arc, centered on the top of the ring.

use std::f64::consts::{FRAC_PI_2, PI};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::label::CHAR_WIDTH_RATIO;
use super::{CircleItem, LabelItem, Rect, Surface};

pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    font_family: String,
    error: Option<JsValue>,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx, font_family: "sans-serif".to_string(), error: None }
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// First drawing error raised by the context, if any.
    pub fn take_error(&mut self) -> Option<JsValue> {
        self.error.take()
    }

    fn check(&mut self, result: Result<(), JsValue>) {
        if let Err(err) = result {
            if self.error.is_none() {
                tracing::warn!(?err, "canvas call failed");
                self.error = Some(err);
            }
        }
    }
}

impl Surface for CanvasSurface<'_> {
    fn begin(&mut self, width: f64, height: f64, clip: &Rect) {
        self.ctx.save();
        self.ctx.clear_rect(0.0, 0.0, width, height);
        self.ctx.begin_path();
        self.ctx.rect(clip.x, clip.y, clip.width, clip.height);
        self.ctx.clip();
    }

    fn circle(&mut self, c: &CircleItem) {
        let ctx = self.ctx;
        ctx.begin_path();
        let arc = ctx.arc(c.center.x, c.center.y, c.radius.max(0.0), 0.0, 2.0 * PI);
        self.check(arc);

        ctx.set_global_alpha(c.style.fill_opacity);
        ctx.set_fill_style_str(&c.style.fill.to_hex());
        ctx.fill();

        ctx.set_global_alpha(1.0);
        ctx.set_stroke_style_str(&c.style.stroke.to_hex());
        ctx.set_line_width(c.style.stroke_width);
        ctx.stroke();
    }

    fn label(&mut self, label: &LabelItem) {
        let radius = label.arc.radius;
        if !(radius > 0.0) {
            return;
        }
        let ctx = self.ctx;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str("#000000");
        ctx.set_font(&format!("{}px {}", label.font_size, self.font_family));
        ctx.set_text_align("center");
        ctx.set_text_baseline("alphabetic");

        let step = CHAR_WIDTH_RATIO * label.font_size / radius;
        let count = label.text.chars().count() as f64;
        // Angle 0 points right; the top of the ring is -pi/2.
        let start = -FRAC_PI_2 - step * count / 2.0;
        let center = label.arc.center;

        let mut buf = [0u8; 4];
        for (i, ch) in label.text.chars().enumerate() {
            let angle = start + step * (i as f64 + 0.5);
            ctx.save();
            let moved = ctx.translate(center.x + radius * angle.cos(), center.y + radius * angle.sin());
            self.check(moved);
            let rotated = ctx.rotate(angle + FRAC_PI_2);
            self.check(rotated);
            let drawn = ctx.fill_text(ch.encode_utf8(&mut buf), 0.0, 0.0);
            self.check(drawn);
            ctx.restore();
        }
    }

    fn end(&mut self) {
        self.ctx.restore();
    }
}
