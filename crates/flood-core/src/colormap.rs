//! Continuous linear colour scale.
//!
//! Stops are spread evenly across `[vmin, vmax]` and interpolated linearly per
//! RGB channel. Values outside the domain clamp to the end stops.

use std::fmt;

use serde::{Serialize, Serializer};

/// An sRGB colour, rendered as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const GREEN: Rgb = Rgb([0, 128, 0]);
    pub const YELLOW: Rgb = Rgb([255, 255, 0]);
    pub const RED: Rgb = Rgb([255, 0, 0]);

    pub fn hex(self) -> String {
        self.to_string()
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb([
            mix(self.0[0], other.0[0]),
            mix(self.0[1], other.0[1]),
            mix(self.0[2], other.0[2]),
        ])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Linear colour map over a numeric domain.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearColormap {
    stops: Vec<Rgb>,
    vmin: f64,
    vmax: f64,
    caption: String,
}

impl LinearColormap {
    /// Green → yellow → red over `[vmin, vmax]`, captioned for the legend.
    pub fn flood_risk(vmin: f64, vmax: f64) -> Self {
        Self {
            stops: vec![Rgb::GREEN, Rgb::YELLOW, Rgb::RED],
            vmin,
            vmax,
            caption: "Predicted Flood Risk".into(),
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn vmin(&self) -> f64 {
        self.vmin
    }

    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Position of `value` in [0, 1]. A zero-width domain maps everything to
    /// the middle of the ramp; NaN maps to the first stop.
    pub fn position(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        let span = self.vmax - self.vmin;
        if span <= 0.0 || !span.is_finite() {
            return 0.5;
        }
        ((value - self.vmin) / span).clamp(0.0, 1.0)
    }

    pub fn color_at(&self, value: f64) -> Rgb {
        let n = self.stops.len();
        let pos = self.position(value) * (n - 1) as f64;
        let i = (pos.floor() as usize).min(n - 2);
        self.stops[i].lerp(self.stops[i + 1], pos - i as f64)
    }
}
