//! Density heat layer rendered by `leaflet.heat`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::js_literal;
use crate::colormap::Rgb;
use crate::predictor::ScoredSample;

/// Rendering options passed to `L.heatLayer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatOptions {
    pub min_opacity: f64,
    /// Point influence radius in pixels.
    pub radius: f64,
    /// Blur in pixels.
    pub blur: f64,
    pub max_zoom: u8,
    /// Colour stops keyed by normalised intensity, e.g. `"0.5"`.
    pub gradient: BTreeMap<String, Rgb>,
}

impl Default for HeatOptions {
    fn default() -> Self {
        let gradient = [(0.2, Rgb::GREEN), (0.5, Rgb::YELLOW), (0.8, Rgb::RED)]
            .into_iter()
            .map(|(stop, color)| (stop.to_string(), color))
            .collect();
        Self {
            min_opacity: 0.3,
            radius: 15.0,
            blur: 25.0,
            max_zoom: 18,
            gradient,
        }
    }
}

/// Weighted points `[lat, lon, weight]` with weights in [0, 1].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeatLayer {
    points: Vec<[f64; 3]>,
    options: HeatOptions,
}

impl HeatLayer {
    pub fn new(points: Vec<[f64; 3]>) -> Self {
        Self { points, options: HeatOptions::default() }
    }

    /// One point per row, weighted by `risk_norm`.
    pub fn from_scored(scored: &[ScoredSample]) -> Self {
        Self::new(
            scored
                .iter()
                .map(|s| [s.sample.location.lat, s.sample.location.lon, s.risk_norm])
                .collect(),
        )
    }

    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    pub(super) fn render_js(&self, parent: &str) -> Result<String, serde_json::Error> {
        Ok(format!(
            "L.heatLayer({}, {}).addTo({parent});\n",
            js_literal(&self.points)?,
            js_literal(&self.options)?
        ))
    }
}
