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

// ---------------------------------------------------------------------------
// Color mapping: indicator name → Color32
// ---------------------------------------------------------------------------

/// Maps the indicators of the active category to distinct colours, so an
/// indicator keeps its colour across chart kinds and filter changes.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map from a category's indicator enumeration.
    pub fn new(indicators: &BTreeSet<String>) -> Self {
        let palette = generate_palette(indicators.len());
        let mapping = indicators
            .iter()
            .zip(palette)
            .map(|(name, color)| (name.clone(), color))
            .collect();
        ColorMap { mapping }
    }

    /// Look up an indicator's colour.
    pub fn color_for(&self, indicator: &str) -> Color32 {
        self.mapping.get(indicator).copied().unwrap_or(Color32::GRAY)
    }
}
