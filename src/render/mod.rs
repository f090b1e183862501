pub mod charts;
pub mod layout;
pub mod maps;
pub mod network;
pub mod table;
pub mod wordcloud;

use plotters::style::RGBColor;

/// Color palette for categorical values (data types, cloud terms).
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(231, 76, 60),  // Red
    RGBColor(46, 204, 113), // Green
    RGBColor(155, 89, 182), // Purple
    RGBColor(243, 156, 18), // Orange
    RGBColor(26, 188, 156), // Teal
    RGBColor(233, 30, 99),  // Pink
    RGBColor(0, 188, 212),  // Cyan
    RGBColor(255, 87, 34),  // Deep Orange
    RGBColor(121, 85, 72),  // Brown
    RGBColor(96, 125, 139), // Blue Grey
];

/// Hex forms of `PALETTE`, for the interactive HTML pages.
pub const PALETTE_HEX: [&str; 10] = [
    "#e74c3c", "#2ecc71", "#9b59b6", "#f39c12", "#1abc9c", "#e91e63", "#00bcd4", "#ff5722",
    "#795548", "#607d8b",
];

/// Color for a category by first-seen index. Categories beyond the
/// pre-declared palette all reuse the final color, so a late-arriving
/// data type may not get a distinct legend entry; the caller logs this
/// known fragility instead of correcting it.
pub fn category_color(index: usize) -> RGBColor {
    PALETTE[index.min(PALETTE.len() - 1)]
}

pub fn category_color_hex(index: usize) -> &'static str {
    PALETTE_HEX[index.min(PALETTE_HEX.len() - 1)]
}
