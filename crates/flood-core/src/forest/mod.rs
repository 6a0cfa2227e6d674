//! Random forest regressor: a bagged ensemble of CART regression trees whose
//! prediction is the mean of the trees' predictions.
//!
//! Per-tree seeds are drawn from the master seed before any tree is grown,
//! so the fitted forest is identical with or without the `threading` feature.

pub mod params;
pub mod tree;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "threading")]
use rayon::prelude::*;
use tracing::debug;

use crate::error::ForestError;
pub use params::ForestParams;
pub use tree::RegressionTree;

/// A fitted random forest.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Fit `params.n_estimators` trees on rows `x` against targets `y`.
    pub fn fit(params: &ForestParams, x: &[Vec<f64>], y: &[f64]) -> Result<Self, ForestError> {
        if params.n_estimators == 0 {
            return Err(ForestError::NoEstimators);
        }
        if x.is_empty() {
            return Err(ForestError::NoSamples);
        }
        if x.len() != y.len() {
            return Err(ForestError::LengthMismatch { features: x.len(), targets: y.len() });
        }
        let n_features = x[0].len();
        if let Some((row, r)) = x.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(ForestError::RaggedFeatures { row, expected: n_features, found: r.len() });
        }

        debug!(?params, rows = x.len(), n_features, "fitting random forest");

        let mut master = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.gen()).collect();
        let trees = grow_trees(&seeds, x, y, params, Iteration::default());

        Ok(Self { trees, n_features })
    }

    /// Mean prediction over all trees for one row.
    pub fn predict_one(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Vec<f64> {
        x.iter().map(|row| self.predict_one(row)).collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Average depth across the forest.
    pub fn avg_depth(&self) -> f64 {
        let total: usize = self.trees.iter().map(RegressionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }
}

/// How the per-tree seeds are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Iteration {
    #[cfg_attr(all(feature = "threading", not(test)), allow(dead_code))]
    Serial,
    #[cfg(feature = "threading")]
    Parallel,
}

impl Default for Iteration {
    fn default() -> Self {
        #[cfg(feature = "threading")]
        return Iteration::Parallel;
        #[cfg(not(feature = "threading"))]
        return Iteration::Serial;
    }
}

fn grow_tree(seed: u64, x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> RegressionTree {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = x.len();
    let indices: Vec<usize> = if params.bootstrap {
        (0..n).map(|_| rng.gen_range(0..n)).collect()
    } else {
        (0..n).collect()
    };
    RegressionTree::fit(x, y, indices, params, &mut rng)
}

/// One tree per seed, in seed order.
fn grow_trees(
    seeds: &[u64],
    x: &[Vec<f64>],
    y: &[f64],
    params: &ForestParams,
    iteration: Iteration,
) -> Vec<RegressionTree> {
    match iteration {
        Iteration::Serial => seeds.iter().map(|&s| grow_tree(s, x, y, params)).collect(),
        #[cfg(feature = "threading")]
        Iteration::Parallel => seeds.par_iter().map(|&s| grow_tree(s, x, y, params)).collect(),
    }
}
