//! Risk predictor: fits the forest on every row and scores the same rows.
//!
//! Prediction is in-sample on purpose. The scores describe the dataset; they
//! are not a held-out estimate.

use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::FloodSample;
use crate::error::ForestError;
use crate::forest::{ForestParams, RandomForestRegressor};

/// `risk_norm` assigned to every row when all predictions are equal.
pub const DEGENERATE_RISK_NORM: f64 = 0.5;

/// A sample enriched with its model score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSample {
    pub sample: FloodSample,
    /// In-sample forest prediction, on the target's scale.
    pub predicted_risk: f64,
    /// `predicted_risk` min-max scaled over the whole table, in [0, 1].
    pub risk_norm: f64,
}

/// Min-max scale `values` into [0, 1].
///
/// When every value is equal the range is zero; all outputs are then
/// [`DEGENERATE_RISK_NORM`].
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = min_max(values) else {
        return Vec::new();
    };
    let range = max - min;
    if range <= 0.0 {
        warn!(value = min, rows = values.len(), "constant predictions; using mid-scale risk_norm");
        return vec![DEGENERATE_RISK_NORM; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Smallest and largest value, or None for an empty slice.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}

/// Fits a [`RandomForestRegressor`] and scores the rows it was fitted on.
#[derive(Debug, Clone, Default)]
pub struct RiskPredictor {
    params: ForestParams,
}

impl RiskPredictor {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    /// Fit on all rows' features against `target_risk`, then predict the same
    /// rows and attach both derived values. Output order is input order.
    pub fn fit_predict(&self, samples: &[FloodSample]) -> Result<Vec<ScoredSample>, ForestError> {
        let x: Vec<Vec<f64>> = samples.iter().map(|s| s.features().to_vec()).collect();
        let y: Vec<f64> = samples.iter().map(|s| s.target_risk).collect();

        let model = RandomForestRegressor::fit(&self.params, &x, &y)?;
        let predicted = model.predict(&x);
        let norm = min_max_normalize(&predicted);

        info!(
            rows = samples.len(),
            trees = model.n_trees(),
            avg_depth = model.avg_depth(),
            "forest fitted"
        );

        Ok(samples
            .iter()
            .zip(predicted)
            .zip(norm)
            .map(|((sample, predicted_risk), risk_norm)| ScoredSample {
                sample: sample.clone(),
                predicted_risk,
                risk_norm,
            })
            .collect())
    }
}
