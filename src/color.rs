use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::MedalType;

// ---------------------------------------------------------------------------
// Medal colours
// ---------------------------------------------------------------------------

/// Fill colour for a medal's bar segment.
pub fn medal_color(medal: MedalType) -> Color32 {
    match medal {
        MedalType::Gold => Color32::from_rgb(0xFF, 0xD7, 0x00),
        MedalType::Silver => Color32::from_rgb(0xC0, 0xC0, 0xC0),
        MedalType::Bronze => Color32::from_rgb(0xCD, 0x7F, 0x32),
    }
}

// ---------------------------------------------------------------------------
// Per-group palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.65, 0.55).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}
