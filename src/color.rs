use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Slice colours of the position pie charts.
pub const PIE_COLORS: [Color32; 6] = [
    Color32::from_rgb(0xCD, 0xAD, 0x00),
    Color32::from_rgb(0x5C, 0xAC, 0xEE),
    Color32::from_rgb(0x9F, 0xB6, 0xCD),
    Color32::from_rgb(0xF8, 0xF8, 0xFF),
    Color32::from_rgb(0xFF, 0x7D, 0x40),
    Color32::from_rgb(0xF0, 0x80, 0x80),
];

pub fn pie_color(index: usize) -> Color32 {
    PIE_COLORS[index % PIE_COLORS.len()]
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a text column (club, surname, position) to
/// distinct colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let unique: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        let palette = generate_palette(unique.len());
        ColorMap {
            mapping: unique.into_iter().zip(palette).collect(),
        }
    }

    /// Look up the colour for a value; unknown values are grey.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}
