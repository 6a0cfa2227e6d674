use serde::{Deserialize, Serialize};

/// Hyperparameters for [`super::RandomForestRegressor`].
/// Defaults are the flood-risk model's settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub n_estimators: usize,
    /// Maximum tree depth; the root is depth 0. None grows until pure.
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples become leaves.
    pub min_samples_split: usize,
    /// Every split leaves at least this many samples on each side.
    pub min_samples_leaf: usize,
    /// Features sampled per node. None considers all of them.
    pub max_features: Option<usize>,
    /// Fit each tree on a with-replacement resample of the rows.
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_depth: Some(12),
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}
