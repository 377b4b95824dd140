//! Diverging color ramp for the choropleth fill.
//!
//! Low values map to green, high values to red (a reversed red-yellow-green
//! ramp), with linear interpolation between fixed stops.

use image::Rgba;

/// Fill for states whose value is null ("no data").
pub const NO_DATA: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Ramp stops from low to high.
const STOPS: [Rgba<u8>; 5] = [
    Rgba([26, 152, 80, 255]),   // green
    Rgba([166, 217, 106, 255]), // light green
    Rgba([255, 255, 191, 255]), // yellow
    Rgba([253, 174, 97, 255]),  // orange
    Rgba([215, 48, 39, 255]),   // red
];

/// Color at normalized position `t` in `[0, 1]`; out-of-range input clamps.
pub fn diverging_color(t: f64) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (STOPS.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    if lower >= STOPS.len() - 1 {
        return STOPS[STOPS.len() - 1];
    }
    let frac = scaled - lower as f64;
    blend(STOPS[lower], STOPS[lower + 1], frac)
}

/// Color for a value within `[min, max]`. A degenerate range maps every
/// value to the ramp midpoint.
pub fn color_for(value: f64, min: f64, max: f64) -> Rgba<u8> {
    if max <= min {
        return diverging_color(0.5);
    }
    diverging_color((value - min) / (max - min))
}

fn blend(a: Rgba<u8>, b: Rgba<u8>, t: f64) -> Rgba<u8> {
    let channel = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Rgba([
        channel(a[0], b[0]),
        channel(a[1], b[1]),
        channel(a[2], b[2]),
        255,
    ])
}
