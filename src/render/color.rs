//! Colour handling for choropleth fills.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn parse(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() { return None }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }

    /// Linear blend towards `other`, `t` in [0, 1].
    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb { r: mix(self.r, other.r), g: mix(self.g, other.g), b: mix(self.b, other.b) }
    }
}

/// Sample `n` colours evenly along the piecewise-linear ramp through `stops`.
pub(crate) fn ramp(stops: &[Rgb], n: usize) -> Vec<Rgb> {
    match stops {
        [] => vec![Rgb::new(150, 150, 150); n],
        [only] => vec![*only; n],
        _ => (0..n)
            .map(|i| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 };
                let position = t * (stops.len() - 1) as f64;
                let segment = (position.floor() as usize).min(stops.len() - 2);
                stops[segment].lerp(stops[segment + 1], position - segment as f64)
            })
            .collect(),
    }
}
