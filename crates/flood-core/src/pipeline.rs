//! Pipeline orchestrator: runs all dashboard stages in order.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::colormap::LinearColormap;
use crate::config::DashboardConfig;
use crate::coords::LatLon;
use crate::dataset::load_samples;
use crate::error::Result;
use crate::export::export_html;
use crate::map::{
    HeatLayer, Legend, MapDocument, MarkerLayer, Overlay, HEATMAP_LAYER_NAME, MARKER_LAYER_NAME,
};
use crate::predictor::{min_max, RiskPredictor, ScoredSample};
use crate::widget::filter_widget;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub rows: usize,
    pub output: PathBuf,
    pub risk_min: f64,
    pub risk_max: f64,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardPipeline {
    config: DashboardConfig,
}

impl DashboardPipeline {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Run the full pipeline.
    ///
    /// Pipeline order:
    ///   1. Load the table
    ///   2. Fit the forest and score every row
    ///   3. Compose the map
    ///   4. Inject the filter widget
    ///   5. Export the HTML
    pub fn run(&self) -> Result<DashboardSummary> {
        let started = Instant::now();
        let cfg = &self.config;

        // ── 1. Load ─────────────────────────────────────────────────────────
        let samples = load_samples(&cfg.input, &cfg.schema)?;

        // ── 2. Predict ──────────────────────────────────────────────────────
        debug!(params = ?cfg.forest, "fitting forest");
        let scored = RiskPredictor::new(cfg.forest.clone()).fit_predict(&samples)?;

        // ── 3–4. Compose and inject ─────────────────────────────────────────
        let document = self.compose(&scored);

        // ── 5. Export ───────────────────────────────────────────────────────
        export_html(&document, &cfg.output)?;

        let predicted: Vec<f64> = scored.iter().map(|s| s.predicted_risk).collect();
        let (risk_min, risk_max) = min_max(&predicted).unwrap_or((0.0, 0.0));
        Ok(DashboardSummary {
            rows: scored.len(),
            output: cfg.output.clone(),
            risk_min,
            risk_max,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Build the map for already scored rows, filter widget included.
    ///
    /// The map is centred on the mean location. Marker colours span the
    /// predicted risk range, heat weights use `risk_norm`.
    pub fn compose(&self, scored: &[ScoredSample]) -> MapDocument {
        let center = LatLon::mean(scored.iter().map(|s| s.sample.location))
            .unwrap_or(LatLon::new(0.0, 0.0));
        let predicted: Vec<f64> = scored.iter().map(|s| s.predicted_risk).collect();
        let (vmin, vmax) = min_max(&predicted).unwrap_or((0.0, 1.0));
        let colormap = LinearColormap::flood_risk(vmin, vmax);

        let heat = HeatLayer::from_scored(scored);
        let markers = MarkerLayer::from_scored(scored, &colormap);
        info!(points = heat.points().len(), markers = markers.len(), "map composed");

        let mut document = MapDocument::new(center, self.config.zoom);
        document
            .add_overlay(HEATMAP_LAYER_NAME, true, Overlay::Heat(heat))
            .add_overlay(MARKER_LAYER_NAME, true, Overlay::Markers(markers))
            .set_legend(Legend::from_colormap(&colormap))
            .add_layer_control()
            .inject(filter_widget());
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::FloodSample;
    use crate::error::{DatasetError, FloodError};
    use crate::forest::ForestParams;
    use crate::predictor::DEGENERATE_RISK_NORM;
    use std::fs;

    const HEADER: &str = "latitude_x,longitude_x,altitude (ft),total_rainfall_year,average_daily_rain,\
max_daily_rain,rainy_days_count,heavy_rain_events,very_heavy_events,mean_precip_probability,\
mean_precip_cover,WNTW_RISKV";

    fn scored(lat: f64, predicted_risk: f64, risk_norm: f64) -> ScoredSample {
        ScoredSample {
            sample: FloodSample {
                location: LatLon::new(lat, -75.0),
                altitude_ft: 50.0,
                total_rainfall_year: 44.0,
                average_daily_rain: 0.12,
                max_daily_rain: 2.5,
                rainy_days_count: 110,
                heavy_rain_events: 6,
                very_heavy_events: 1,
                mean_precip_probability: 33.0,
                mean_precip_cover: 12.0,
                target_risk: predicted_risk,
            },
            predicted_risk,
            risk_norm,
        }
    }

    fn small_forest() -> ForestParams {
        ForestParams { n_estimators: 16, ..ForestParams::default() }
    }

    fn write_csv(dir: &std::path::Path, rows: &[&str]) -> PathBuf {
        let path = dir.join("input.csv");
        let mut text = String::from(HEADER);
        for r in rows {
            text.push('\n');
            text.push_str(r);
        }
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn one_marker_and_one_heat_point_per_row() {
        let rows = vec![scored(40.0, 1.0, 0.0), scored(40.2, 2.0, 0.5), scored(40.4, 3.0, 1.0)];
        let doc = DashboardPipeline::default().compose(&rows);

        match doc.overlay(MARKER_LAYER_NAME).map(|g| &g.overlay) {
            Some(Overlay::Markers(m)) => assert_eq!(m.len(), 3),
            other => panic!("marker overlay missing: {other:?}"),
        }
        match doc.overlay(HEATMAP_LAYER_NAME).map(|g| &g.overlay) {
            Some(Overlay::Heat(h)) => {
                let weights: Vec<f64> = h.points().iter().map(|p| p[2]).collect();
                assert_eq!(weights, vec![0.0, 0.5, 1.0]);
            }
            other => panic!("heat overlay missing: {other:?}"),
        }
        assert!((doc.center().lat - 40.2).abs() < 1e-12);
        assert_eq!(doc.zoom(), 11);
        assert_eq!(doc.fragments().len(), 1);
    }

    #[test]
    fn heatmap_toggle_is_independent_of_markers_and_legend() {
        let rows = vec![scored(40.0, 1.0, 0.0), scored(40.4, 3.0, 1.0)];
        let doc = DashboardPipeline::default().compose(&rows);
        assert!(doc.has_layer_control());
        assert!(doc.legend().is_some());

        let html = doc.render().unwrap();
        assert!(html.contains(r#""Flood Risk Heatmap": overlay_0, "Detailed Points": overlay_1"#));
        // Heat points live only in overlay_0, markers only in overlay_1.
        assert_eq!(html.matches(".addTo(overlay_0);").count(), 1);
        assert!(html.contains("L.heatLayer("));
        assert_eq!(html.matches(".addTo(overlay_1);").count(), 2);
        assert!(html.contains("legend.addTo(map);"));
    }

    #[test]
    fn end_to_end_writes_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(
            dir.path(),
            &[
                "40.10,-75.20,10,44.0,0.12,2.5,110,6,1,33.0,12.0,1.0",
                "40.20,-75.30,20,44.0,0.12,2.5,110,6,1,33.0,12.0,2.0",
                "40.30,-75.40,30,44.0,0.12,2.5,110,6,1,33.0,12.0,3.0",
                "40.40,-75.50,40,44.0,0.12,2.5,110,6,1,33.0,12.0,4.0",
            ],
        );
        let output = dir.path().join("dash.html");
        let config = DashboardConfig {
            input,
            output: output.clone(),
            forest: small_forest(),
            ..DashboardConfig::default()
        };

        let summary = DashboardPipeline::new(config).run().unwrap();
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.output, output);
        assert!(summary.risk_min < summary.risk_max);

        let html = fs::read_to_string(&output).unwrap();
        assert_eq!(html.matches("L.circleMarker(").count(), 4);
        assert!(html.contains("id=\"riskSlider\""));
        assert!(html.contains("Predicted Flood Risk"));
    }

    #[test]
    fn constant_target_renders_without_nan() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(
            dir.path(),
            &[
                "40.10,-75.20,10,44.0,0.12,2.5,110,6,1,33.0,12.0,5.0",
                "40.20,-75.30,20,41.0,0.11,2.1,100,5,0,31.0,11.0,5.0",
                "40.30,-75.40,30,39.0,0.10,1.9,90,4,0,29.0,10.0,5.0",
            ],
        );
        let output = dir.path().join("flat.html");
        let pipeline = DashboardPipeline::new(DashboardConfig {
            input: input.clone(),
            output: output.clone(),
            forest: small_forest(),
            ..DashboardConfig::default()
        });

        let summary = pipeline.run().unwrap();
        assert_eq!(summary.risk_min, summary.risk_max);

        let html = fs::read_to_string(&output).unwrap();
        assert!(!html.contains("NaN"));
        assert!(!html.contains("null"));

        let samples = load_samples(&input, &pipeline.config().schema).unwrap();
        let scored = RiskPredictor::new(small_forest()).fit_predict(&samples).unwrap();
        assert!(scored.iter().all(|s| s.risk_norm == DEGENERATE_RISK_NORM));
    }

    #[test]
    fn missing_input_is_a_dataset_error() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = DashboardPipeline::new(DashboardConfig {
            input: dir.path().join("absent.csv"),
            output: dir.path().join("out.html"),
            ..DashboardConfig::default()
        });
        assert!(matches!(
            pipeline.run(),
            Err(FloodError::Dataset(DatasetError::Open { .. }))
        ));
        assert!(!dir.path().join("out.html").exists());
    }
}
