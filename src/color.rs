use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Chart colors
// ---------------------------------------------------------------------------

/// Bar and line series color (saddle brown).
pub const SERIES_BROWN: Color32 = Color32::from_rgb(0x8B, 0x45, 0x13);
/// Secondary series color for the comparison chart (burlywood).
pub const SERIES_LIGHT_BROWN: Color32 = Color32::from_rgb(0xDE, 0xB8, 0x87);
/// Fill for countries with no data on the maps.
pub const MAP_NO_DATA: Color32 = Color32::from_gray(60);

// ---------------------------------------------------------------------------
// Sequential color scale for the choropleth maps
// ---------------------------------------------------------------------------

/// A piecewise-linear color ramp sampled by a normalized value in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<(f64, LinSrgb)>,
}

impl ColorScale {
    /// The dashboard's brown ramp, cornsilk through dark sienna.
    pub fn batik_brown() -> Self {
        ColorScale::from_rgb_stops(&[
            (0.0, (0xFF, 0xF8, 0xDC)),
            (0.2, (0xDE, 0xB8, 0x87)),
            (0.4, (0xD2, 0xB4, 0x8C)),
            (0.6, (0xA0, 0x52, 0x2D)),
            (0.8, (0x8B, 0x45, 0x13)),
            (1.0, (0x5D, 0x40, 0x37)),
        ])
    }

    /// Build a scale from `(position, rgb)` stops sorted by position.
    pub fn from_rgb_stops(stops: &[(f64, (u8, u8, u8))]) -> Self {
        let stops = stops
            .iter()
            .map(|&(t, (r, g, b))| {
                let srgb: Srgb = Srgb::new(
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                );
                (t, srgb.into_linear())
            })
            .collect();
        ColorScale { stops }
    }

    /// Sample the ramp at `t`, clamped into `[0, 1]`.
    pub fn sample(&self, t: f64) -> Color32 {
        let t = t.clamp(0.0, 1.0);

        let mut lin = match self.stops.first() {
            Some(&(_, c)) => c,
            None => return Color32::GRAY,
        };
        for window in self.stops.windows(2) {
            let (t0, c0) = window[0];
            let (t1, c1) = window[1];
            if t <= t0 {
                break;
            }
            if t >= t1 {
                lin = c1;
                continue;
            }
            let f = ((t - t0) / (t1 - t0)) as f32;
            lin = c0.mix(c1, f);
            break;
        }

        let out: Srgb = Srgb::from_linear(lin);
        Color32::from_rgb(
            (out.red * 255.0).round() as u8,
            (out.green * 255.0).round() as u8,
            (out.blue * 255.0).round() as u8,
        )
    }
}
