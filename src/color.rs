use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Continuous colour scale
// ---------------------------------------------------------------------------

/// Fill for bars that carry no shade value.
pub const DEFAULT_BAR_COLOR: Color32 = Color32::from_rgb(0x63, 0x6E, 0xFA);

/// Anchor colours of the viridis map, dark to bright.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3B, 0x52, 0x8B),
    (0x21, 0x90, 0x8C),
    (0x5D, 0xC9, 0x63),
    (0xFD, 0xE7, 0x25),
];

/// Maps numbers in `[min, max]` onto a piecewise-linear colour gradient.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<LinSrgb>,
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Viridis scale spanning the given values. Non-finite values are ignored.
    pub fn viridis<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (min, max) = if min.is_finite() { (min, max) } else { (0.0, 1.0) };

        let stops = VIRIDIS
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        ColorScale { stops, min, max }
    }

    /// Colour for a value; values outside the range are clamped.
    pub fn color_for(&self, value: f64) -> Color32 {
        let range = self.max - self.min;
        let t = if range.abs() < f64::EPSILON || !value.is_finite() {
            0.5
        } else {
            ((value - self.min) / range).clamp(0.0, 1.0)
        };
        self.sample(t as f32)
    }

    fn sample(&self, t: f32) -> Color32 {
        let segments = (self.stops.len() - 1) as f32;
        let pos = t * segments;
        let idx = (pos.floor() as usize).min(self.stops.len() - 2);
        let local = pos - idx as f32;
        let mixed = self.stops[idx].mix(self.stops[idx + 1], local);
        let rgb: Srgb<u8> = Srgb::from_linear(mixed);
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }
}
