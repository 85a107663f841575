//! Isolation Forest
//!
//! Unsupervised outlier ensemble. Each tree isolates a random sub-sample by
//! recursive random splits; points that isolate in few splits score high.
//!
//! Every tree draws its own seed from one seeded `StdRng`, so trees can be
//! built in parallel and two fits on identical data are identical.

use ndarray::{ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Euler–Mascheroni constant, used in the harmonic number approximation
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, PartialEq)]
pub struct ForestOptions {
    pub n_trees: usize,
    /// Rows per tree, capped at the row count
    pub sample_size: usize,
    pub seed: u64,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IsolationTree {
    root: Node,
}

#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
}

/// Average path length of an unsuccessful BST search over `n` points
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

impl IsolationForest {
    /// Fit on a (rows × features) matrix with at least 2 rows
    pub fn fit(data: ArrayView2<f64>, options: &ForestOptions) -> Self {
        let n_rows = data.nrows();
        let sample_size = options.sample_size.min(n_rows).max(1);
        let max_depth = (sample_size as f64).log2().ceil() as usize;

        let mut master = StdRng::seed_from_u64(options.seed);
        let seeds: Vec<u64> = (0..options.n_trees).map(|_| master.gen()).collect();

        let trees = seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let rows = sample(&mut rng, n_rows, sample_size).into_vec();
                IsolationTree {
                    root: build_node(&data, rows, 0, max_depth, &mut rng),
                }
            })
            .collect();

        Self { trees, sample_size }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Anomaly score in (0, 1]; higher is more anomalous
    pub fn score(&self, sample: ArrayView1<f64>) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let mean_path = self
            .trees
            .iter()
            .map(|t| path_length(&t.root, &sample, 0))
            .sum::<f64>()
            / self.trees.len() as f64;

        let norm = average_path_length(self.sample_size);
        if norm <= 0.0 {
            return 0.5;
        }
        2f64.powf(-mean_path / norm)
    }

    /// Score every row of the matrix
    pub fn score_samples(&self, data: ArrayView2<f64>) -> Vec<f64> {
        let rows: Vec<ArrayView1<f64>> = data.axis_iter(Axis(0)).collect();
        rows.par_iter().map(|row| self.score(row.view())).collect()
    }
}

fn build_node(data: &ArrayView2<f64>, rows: Vec<usize>, depth: usize, max_depth: usize, rng: &mut StdRng) -> Node {
    if depth >= max_depth || rows.len() <= 1 {
        return Node::Leaf { size: rows.len() };
    }

    // Features that still vary inside this node
    let candidates: Vec<(usize, f64, f64)> = (0..data.ncols())
        .filter_map(|feature| {
            let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                let v = data[[r, feature]];
                (lo.min(v), hi.max(v))
            });
            // Non-finite bounds or spans cannot be sampled uniformly
            (lo < hi && (hi - lo).is_finite()).then_some((feature, lo, hi))
        })
        .collect();

    if candidates.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(lo..hi);

    // threshold in [lo, hi): both sides are non-empty
    let (left, right): (Vec<usize>, Vec<usize>) = rows.into_iter().partition(|&r| data[[r, feature]] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(data, left, depth + 1, max_depth, rng)),
        right: Box::new(build_node(data, right, depth + 1, max_depth, rng)),
    }
}

fn path_length(node: &Node, sample: &ArrayView1<f64>, depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split { feature, threshold, left, right } => {
            if sample[*feature] <= *threshold {
                path_length(left, sample, depth + 1)
            } else {
                path_length(right, sample, depth + 1)
            }
        }
    }
}
