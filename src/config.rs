// View configuration.
//
// Every knob the host can turn lives here: viewport, margin, label sizing and
// the focus transition. Hosts send it as camelCase JSON; missing fields fall
// back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::LayoutParams;

/// Easing curve applied to transition progress.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    QuadOut,
    #[default]
    CubicOut,
    CubicInOut,
}

impl Easing {
    /// Map `t` in [0, 1] to eased progress in [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Gap between the viewport edge and the root circle's bounding box.
    pub margin: f64,
    /// On-screen radius a ring needs before its label is drawn.
    pub min_label_radius: f64,
    /// Label font size at depth 0.
    pub base_font_size: f64,
    /// Floor for the depth-scaled font size.
    pub min_font_size: f64,
    /// Font size lost per level of depth.
    pub font_size_depth_step: f64,
    pub transition_duration_ms: f64,
    pub easing: Easing,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            margin: 20.0,
            min_label_radius: 24.0,
            base_font_size: 14.0,
            min_font_size: 8.0,
            font_size_depth_step: 2.0,
            transition_duration_ms: 300.0,
            easing: Easing::CubicOut,
        }
    }
}

impl ViewConfig {
    pub fn from_json(input: &str) -> Result<Self> {
        let cfg: ViewConfig = serde_json::from_str(input)?;
        Ok(cfg.sanitized())
    }

    /// Replace non-finite or negative values with defaults and keep the font
    /// range ordered.
    pub fn sanitized(mut self) -> Self {
        let d = ViewConfig::default();
        let fix = |v: f64, fallback: f64| if v.is_finite() && v >= 0.0 { v } else { fallback };

        self.viewport_width = fix(self.viewport_width, d.viewport_width);
        self.viewport_height = fix(self.viewport_height, d.viewport_height);
        self.margin = fix(self.margin, d.margin);
        self.min_label_radius = fix(self.min_label_radius, d.min_label_radius);
        self.base_font_size = fix(self.base_font_size, d.base_font_size);
        self.min_font_size = fix(self.min_font_size, d.min_font_size).min(self.base_font_size);
        self.font_size_depth_step = fix(self.font_size_depth_step, d.font_size_depth_step);
        self.transition_duration_ms = fix(self.transition_duration_ms, d.transition_duration_ms);
        self
    }

    /// Label font size for a ring at `depth`: shrinks with depth down to the floor.
    pub fn font_size(&self, depth: usize) -> f64 {
        let size = self.base_font_size - depth as f64 * self.font_size_depth_step;
        size.max(self.min_font_size)
    }

    /// Default packing padding: the room a curved label needs at `depth`.
    pub fn padding(&self, depth: usize) -> f64 {
        self.font_size(depth)
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            width: self.viewport_width,
            height: self.viewport_height,
            margin: self.margin,
        }
    }
}
