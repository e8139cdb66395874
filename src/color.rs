use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Used to tell the pollutant series apart in the yearly bar chart.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous colour maps
// ---------------------------------------------------------------------------

/// Map a normalised temperature (0 = coldest, 1 = warmest) onto a
/// blue-to-red hue sweep. Out-of-range input is clamped.
pub fn thermal(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let hue = 230.0 - t * 220.0;
    let rgb: Srgb = Hsl::new(hue, 0.85, 0.5).into_color();
    to_color32(rgb)
}

/// Diverging map for correlation coefficients in [-1, 1]:
/// blue at -1, white at 0, red at +1.
pub fn diverging(r: f32) -> Color32 {
    let r = r.clamp(-1.0, 1.0);
    let white = LinSrgb::new(1.0f32, 1.0, 1.0);
    let mixed = if r < 0.0 {
        let blue = LinSrgb::new(0.13f32, 0.28, 0.76);
        white.mix(blue, -r)
    } else {
        let red = LinSrgb::new(0.80f32, 0.16, 0.15);
        white.mix(red, r)
    };
    to_color32(Srgb::from_linear(mixed))
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
