// Curved label fitting.
//
// A label runs along the upper half of its ring, so the room it gets is half
// the circumference. Glyph widths are estimated, not measured.

use std::f64::consts::PI;

/// Average glyph width as a fraction of the font size.
pub const CHAR_WIDTH_RATIO: f64 = 0.6;

pub const ELLIPSIS: char = '\u{2026}';

/// How many characters fit on the half circumference of a ring of `radius`.
pub fn char_budget(radius: f64, font_size: f64) -> usize {
    if !(radius.is_finite() && radius > 0.0 && font_size.is_finite() && font_size > 0.0) {
        return 0;
    }
    (radius * PI / (CHAR_WIDTH_RATIO * font_size)).floor() as usize
}

/// Fit `text` onto a ring. Text that fits is returned unchanged; otherwise it
/// is cut so that the kept characters plus the ellipsis equal the budget.
pub fn fit_label(text: &str, radius: f64, font_size: f64) -> String {
    let budget = char_budget(radius, font_size);
    if text.chars().count() <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }
    let mut fitted: String = text.chars().take(budget - 1).collect();
    fitted.push(ELLIPSIS);
    fitted
}
