use std::collections::BTreeMap;

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
            let hue = 30.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
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
// Country colours
// ---------------------------------------------------------------------------

/// Stable country → colour assignment shared by every chart.
#[derive(Debug, Clone)]
pub struct CountryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CountryColors {
    /// Assign colours in the order countries are given.
    pub fn new<S: AsRef<str>>(countries: &[S]) -> Self {
        let palette = generate_palette(countries.len());
        let mapping = countries
            .iter()
            .zip(palette)
            .map(|(c, color)| (c.as_ref().to_string(), color))
            .collect();
        CountryColors { mapping }
    }

    /// Look up the colour for a country, grey if unknown.
    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping.get(country).copied().unwrap_or(Color32::GRAY)
    }
}
