//! Per-row circle markers with popups.
//!
//! Every marker carries the raw `risk`, `elev` and `rain` values as extra
//! Leaflet options. The filter widget reads them from `marker.options`.

use serde::Serialize;

use super::js_literal;
use crate::colormap::{LinearColormap, Rgb};
use crate::coords::LatLon;
use crate::predictor::ScoredSample;

pub const MARKER_RADIUS: f64 = 6.0;
pub const MARKER_FILL_OPACITY: f64 = 0.8;

/// Values the client-side filter compares against its sliders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerAttributes {
    /// Predicted risk, not normalised.
    pub risk: f64,
    /// Altitude in feet.
    pub elev: f64,
    /// Total yearly rainfall in inches.
    pub rain: f64,
}

impl MarkerAttributes {
    pub fn from_scored(s: &ScoredSample) -> Self {
        Self {
            risk: s.predicted_risk,
            elev: s.sample.altitude_ft,
            rain: s.sample.total_rainfall_year,
        }
    }
}

/// Options object for `L.circleMarker`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarkerOptions {
    pub radius: f64,
    pub color: Rgb,
    pub fill: bool,
    pub fill_color: Rgb,
    pub fill_opacity: f64,
    #[serde(flatten)]
    pub attributes: MarkerAttributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleMarker {
    pub location: LatLon,
    pub options: CircleMarkerOptions,
    /// Popup body as HTML.
    pub popup: String,
}

impl CircleMarker {
    /// Marker for one scored row, coloured by `colormap(predicted_risk)`.
    pub fn from_scored(s: &ScoredSample, colormap: &LinearColormap) -> Self {
        let color = colormap.color_at(s.predicted_risk);
        Self {
            location: s.sample.location,
            options: CircleMarkerOptions {
                radius: MARKER_RADIUS,
                color,
                fill: true,
                fill_color: color,
                fill_opacity: MARKER_FILL_OPACITY,
                attributes: MarkerAttributes::from_scored(s),
            },
            popup: popup_html(s),
        }
    }

    fn render_js(&self, parent: &str) -> Result<String, serde_json::Error> {
        Ok(format!(
            "L.circleMarker({}, {}).bindPopup({}).addTo({parent});\n",
            js_literal(&self.location.to_array())?,
            js_literal(&self.options)?,
            js_literal(&self.popup)?
        ))
    }
}

/// Popup body listing the row's score and rainfall statistics.
pub fn popup_html(s: &ScoredSample) -> String {
    let r = &s.sample;
    [
        format!("<b>Predicted Risk:</b> {:.2}", s.predicted_risk),
        format!("<b>Elevation:</b> {:.1} ft", r.altitude_ft),
        format!("<b>Total Rainfall:</b> {:.2} in", r.total_rainfall_year),
        format!("<b>Average Daily Rain:</b> {:.3} in", r.average_daily_rain),
        format!("<b>Max Daily Rain:</b> {:.2} in", r.max_daily_rain),
        format!("<b>Rainy Days:</b> {}", r.rainy_days_count),
        format!("<b>Heavy Rain Events:</b> {}", r.heavy_rain_events),
        format!("<b>Very Heavy Rain Events:</b> {}", r.very_heavy_events),
        format!("<b>Mean Precip Probability:</b> {:.2}%", r.mean_precip_probability),
        format!("<b>Mean Precip Coverage:</b> {:.2}", r.mean_precip_cover),
    ]
    .join("<br>")
}

/// All markers of the "Detailed Points" overlay, in table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerLayer {
    markers: Vec<CircleMarker>,
}

impl MarkerLayer {
    pub fn from_scored(scored: &[ScoredSample], colormap: &LinearColormap) -> Self {
        Self {
            markers: scored.iter().map(|s| CircleMarker::from_scored(s, colormap)).collect(),
        }
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub(super) fn render_js(&self, parent: &str) -> Result<String, serde_json::Error> {
        self.markers.iter().map(|m| m.render_js(parent)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::FloodSample;

    fn scored(predicted_risk: f64) -> ScoredSample {
        ScoredSample {
            sample: FloodSample {
                location: LatLon::new(39.95, -75.16),
                altitude_ft: 39.04,
                total_rainfall_year: 44.456,
                average_daily_rain: 0.12179,
                max_daily_rain: 2.5,
                rainy_days_count: 121,
                heavy_rain_events: 7,
                very_heavy_events: 2,
                mean_precip_probability: 33.3333,
                mean_precip_cover: 11.876,
                target_risk: 0.5,
            },
            predicted_risk,
            risk_norm: 0.4,
        }
    }

    #[test]
    fn popup_uses_fixed_precisions() {
        let html = popup_html(&scored(0.4567));
        assert_eq!(
            html,
            "<b>Predicted Risk:</b> 0.46<br>\
             <b>Elevation:</b> 39.0 ft<br>\
             <b>Total Rainfall:</b> 44.46 in<br>\
             <b>Average Daily Rain:</b> 0.122 in<br>\
             <b>Max Daily Rain:</b> 2.50 in<br>\
             <b>Rainy Days:</b> 121<br>\
             <b>Heavy Rain Events:</b> 7<br>\
             <b>Very Heavy Rain Events:</b> 2<br>\
             <b>Mean Precip Probability:</b> 33.33%<br>\
             <b>Mean Precip Coverage:</b> 11.88"
        );
    }

    #[test]
    fn options_carry_raw_filter_attributes() {
        let cm = LinearColormap::flood_risk(0.0, 1.0);
        let m = CircleMarker::from_scored(&scored(0.75), &cm);
        let json = js_literal(&m.options).unwrap();
        assert_eq!(
            json,
            r##"{"radius":6.0,"color":"#ff8000","fill":true,"fillColor":"#ff8000","fillOpacity":0.8,"risk":0.75,"elev":39.04,"rain":44.456}"##
        );
    }

    #[test]
    fn one_marker_per_row_in_order() {
        let cm = LinearColormap::flood_risk(0.0, 3.0);
        let rows = vec![scored(0.0), scored(1.5), scored(3.0)];
        let layer = MarkerLayer::from_scored(&rows, &cm);
        assert_eq!(layer.len(), 3);
        assert_eq!(layer.markers()[0].options.color, Rgb::GREEN);
        assert_eq!(layer.markers()[1].options.color, Rgb::YELLOW);
        assert_eq!(layer.markers()[2].options.color, Rgb::RED);

        let js = layer.render_js("overlay_1").unwrap();
        assert_eq!(js.matches("L.circleMarker(").count(), 3);
        assert_eq!(js.matches(".addTo(overlay_1);").count(), 3);
    }

    #[test]
    fn popup_markup_is_escaped_for_script() {
        let cm = LinearColormap::flood_risk(0.0, 1.0);
        let js = CircleMarker::from_scored(&scored(0.5), &cm).render_js("g").unwrap();
        assert!(js.contains(r#".bindPopup("<b>Predicted Risk:<\/b> 0.50<br>"#));
        assert!(js.contains(r#"11.88").addTo(g);"#), "popup takes Leaflet's default options");
        assert!(!js.contains("maxWidth"));
    }
}
