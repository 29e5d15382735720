//! Dashboard colors and axis helpers.

use ratatui::style::Color;

pub const HEADER_FG: Color = Color::Black;
pub const HEADER_BG: Color = Color::Cyan;
pub const FOOTER_FG: Color = Color::DarkGray;

pub const SOLAR_COLOR: Color = Color::Yellow;
pub const WIND_COLOR: Color = Color::Cyan;
pub const LOAD_COLOR: Color = Color::Red;
pub const OFFSHORE_COLOR: Color = Color::Blue;
pub const ACTUAL_COLOR: Color = Color::Gray;
pub const PREDICTED_COLOR: Color = Color::Magenta;

/// Y-axis bounds covering all datasets with a 5% margin.
///
/// Falls back to `[0, 1]` when no point exists.
pub fn auto_bounds_y(datasets: &[&[(f64, f64)]]) -> [f64; 2] {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for data in datasets {
        for &(_, y) in *data {
            lo = lo.min(y);
            hi = hi.max(y);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if lo == hi {
        return [lo - 1.0, hi + 1.0];
    }
    let margin = (hi - lo) * 0.05;
    [lo - margin, hi + margin]
}
