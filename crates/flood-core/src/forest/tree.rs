//! CART regression tree.
//!
//! Nodes are stored in a flat vector; children are referenced by index.
//! Splits minimise the summed squared error of the two children, which is
//! equivalent to maximising `sum_l² / n_l + sum_r² / n_r` over targets
//! centred at the node mean.

use rand::rngs::StdRng;

use super::params::ForestParams;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        /// Rows with `x[feature] <= threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    depth: usize,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

struct Grower<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    max_depth: Option<usize>,
    min_split: usize,
    min_leaf: usize,
    max_features: Option<usize>,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
    depth: usize,
}

impl RegressionTree {
    /// Fit on the rows named by `indices` (duplicates allowed, as produced by
    /// bootstrap resampling). `indices` must be non-empty and every row of `x`
    /// must have the same width.
    pub(crate) fn fit(
        x: &[Vec<f64>],
        y: &[f64],
        mut indices: Vec<usize>,
        params: &ForestParams,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let mut grower = Grower {
            x,
            y,
            max_depth: params.max_depth,
            min_split: params.min_samples_split.max(2),
            min_leaf: params.min_samples_leaf.max(1),
            max_features: params.max_features,
            rng,
            nodes: Vec::new(),
            depth: 0,
        };
        grower.grow(&mut indices, 0, n_features);
        Self {
            nodes: grower.nodes,
            depth: grower.depth,
        }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                Node::Leaf { value } => return value,
                Node::Split { feature, threshold, left, right } => {
                    i = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Depth of the deepest leaf; a single-leaf tree has depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

}

impl Grower<'_> {
    /// Grow the subtree for `idx` and return its root node index.
    fn grow(&mut self, idx: &mut [usize], depth: usize, n_features: usize) -> usize {
        self.depth = self.depth.max(depth);
        let node = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean(self.y, idx) });

        let at_max_depth = self.max_depth.is_some_and(|d| depth >= d);
        if at_max_depth || idx.len() < self.min_split || is_pure(self.y, idx) {
            return node;
        }
        let Some(split) = self.best_split(idx, n_features) else {
            return node;
        };

        // Partition in place: left block first, right block after.
        let x = self.x;
        idx.sort_by_key(|&i| x[i][split.feature] > split.threshold);
        let n_left = idx.partition_point(|&i| x[i][split.feature] <= split.threshold);
        let (l, r) = idx.split_at_mut(n_left);

        let left = self.grow(l, depth + 1, n_features);
        let right = self.grow(r, depth + 1, n_features);
        self.nodes[node] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node
    }

    fn candidate_features(&mut self, n_features: usize) -> Vec<usize> {
        match self.max_features {
            Some(k) if k < n_features => {
                rand::seq::index::sample(&mut *self.rng, n_features, k.max(1)).into_vec()
            }
            _ => (0..n_features).collect(),
        }
    }

    fn best_split(&mut self, idx: &[usize], n_features: usize) -> Option<SplitCandidate> {
        let n = idx.len();
        // Scores are taken on targets centred at the node mean; raw sums lose
        // small differences under a large common offset.
        let offset = mean(self.y, idx);
        let total: f64 = idx.iter().map(|&i| self.y[i] - offset).sum();
        let parent_score = total * total / n as f64;
        let mut best: Option<SplitCandidate> = None;
        let mut order = idx.to_vec();

        for f in self.candidate_features(n_features) {
            let x = self.x;
            order.sort_by(|&a, &b| x[a][f].total_cmp(&x[b][f]));

            let mut sum_left = 0.0;
            for k in 1..n {
                sum_left += self.y[order[k - 1]] - offset;
                let lo = x[order[k - 1]][f];
                let hi = x[order[k]][f];
                if lo == hi || k < self.min_leaf || n - k < self.min_leaf {
                    continue;
                }
                let sum_right = total - sum_left;
                let score = sum_left * sum_left / k as f64
                    + sum_right * sum_right / (n - k) as f64;
                let best_score = best.as_ref().map_or(parent_score, |b| b.score);
                if score > best_score + f64::EPSILON * best_score.abs() {
                    let mid = lo + (hi - lo) / 2.0;
                    // Rounding can push the midpoint onto `hi`.
                    let threshold = if mid >= hi { lo } else { mid };
                    best = Some(SplitCandidate { feature: f, threshold, score });
                }
            }
        }
        best
    }
}

fn mean(y: &[f64], idx: &[usize]) -> f64 {
    idx.iter().map(|&i| y[i]).sum::<f64>() / idx.len() as f64
}

fn is_pure(y: &[f64], idx: &[usize]) -> bool {
    let first = y[idx[0]];
    idx.iter().all(|&i| y[i] == first)
}
