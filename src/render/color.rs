// Depth -> color gradient for rings.

use serde::{Serialize, Serializer};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Color of the outermost ring.
pub const SHALLOW: Rgb = Rgb::new(0xa3, 0xf5, 0xcf);
/// Color of the deepest ring.
pub const DEEP: Rgb = Rgb::new(0x47, 0x54, 0x85);

/// Ring color for `depth`, normalized by the tree's deepest level.
pub fn depth_color(depth: usize, max_depth: usize) -> Rgb {
    if max_depth == 0 {
        return SHALLOW;
    }
    SHALLOW.lerp(DEEP, depth as f64 / max_depth as f64)
}
