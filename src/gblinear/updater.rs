//! Coordinate descent updates for the linear booster.
//!
//! Gradients come from the squared-error objective (`grad = pred - label`,
//! `hess = 1`). Penalties are scaled by the number of training rows before use,
//! so `lambda` and `alpha` act per sample rather than on the summed loss.
//!
//! Data is accessed feature-major: `features[[feature, row]]`.

use ndarray::{ArrayView1, ArrayView2, ArrayViewMut1};
use rayon::prelude::*;

use crate::params::{BoosterParams, UpdaterKind};

use super::model::LinearModel;

/// Hessians below this are treated as zero.
const MIN_HESS: f64 = 1e-5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradientPair {
    pub grad: f32,
    pub hess: f32,
}

/// Per-row gradient buffer for the squared-error objective.
#[derive(Debug, Clone)]
pub struct Gradients {
    pairs: Vec<GradientPair>,
}

impl Gradients {
    pub fn new(n_samples: usize) -> Self {
        Self {
            pairs: vec![GradientPair::default(); n_samples],
        }
    }

    /// Recomputes gradients from current predictions.
    pub fn compute(&mut self, predictions: ArrayView1<'_, f32>, labels: ArrayView1<'_, f32>) {
        debug_assert_eq!(predictions.len(), self.pairs.len());
        for ((pair, &pred), &label) in self.pairs.iter_mut().zip(predictions).zip(labels) {
            pair.grad = pred - label;
            pair.hess = 1.0;
        }
    }

    pub fn pairs(&self) -> &[GradientPair] {
        &self.pairs
    }

    /// Shifts every gradient by `delta * x` after a weight moved by `delta`.
    pub fn add_column(&mut self, column: ArrayView1<'_, f32>, delta: f32) {
        for (pair, &x) in self.pairs.iter_mut().zip(column) {
            pair.grad += delta * x;
        }
    }

    /// Sum of gradients and hessians over all rows.
    pub fn sum(&self) -> (f64, f64) {
        self.pairs.iter().fold((0.0, 0.0), |(g, h), pair| {
            (g + pair.grad as f64, h + pair.hess as f64)
        })
    }
}

/// Regularization and step size used by the updates.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// L1 penalty, already scaled by the number of rows.
    pub alpha: f64,
    /// L2 penalty, already scaled by the number of rows.
    pub lambda: f64,
    pub learning_rate: f64,
    /// Number of feature blocks the shotgun updater splits a round into.
    pub workers: usize,
}

impl UpdateConfig {
    pub fn from_params(params: &BoosterParams, n_samples: usize) -> Self {
        let scale = n_samples as f64;
        Self {
            alpha: params.regularization_l1 * scale,
            lambda: params.regularization_l2 * scale,
            learning_rate: params.learning_rate,
            workers: params.thread_count.max(1),
        }
    }
}

/// Elastic-net coordinate step for one weight, before the learning rate.
///
/// The step never moves the weight across zero: when the unpenalized target lies on
/// the other side, the weight is clamped to exactly zero.
pub fn coordinate_delta(sum_grad: f64, sum_hess: f64, weight: f64, alpha: f64, lambda: f64) -> f64 {
    if sum_hess < MIN_HESS {
        return 0.0;
    }
    let grad_l2 = sum_grad + lambda * weight;
    let hess_l2 = sum_hess + lambda;
    let target = weight - grad_l2 / hess_l2;
    if target >= 0.0 {
        (-(grad_l2 + alpha) / hess_l2).max(-weight)
    } else {
        (-(grad_l2 - alpha) / hess_l2).min(-weight)
    }
}

/// Applies bias and weight updates to a [`LinearModel`].
#[derive(Debug, Clone)]
pub struct Updater {
    kind: UpdaterKind,
    config: UpdateConfig,
}

impl Updater {
    pub fn new(kind: UpdaterKind, config: UpdateConfig) -> Self {
        Self { kind, config }
    }

    pub fn kind(&self) -> UpdaterKind {
        self.kind
    }

    /// Newton step on the bias. Returns the applied delta, 0 if the hessian vanishes.
    pub fn update_bias(&self, model: &mut LinearModel, gradients: &Gradients) -> f32 {
        let (sum_grad, sum_hess) = gradients.sum();
        if sum_hess.abs() < MIN_HESS {
            return 0.0;
        }
        let delta = (-sum_grad / sum_hess * self.config.learning_rate) as f32;
        model.add_bias(delta);
        delta
    }

    /// Step for a single feature given the current gradients.
    pub fn weight_delta(
        &self,
        model: &LinearModel,
        features: ArrayView2<'_, f32>,
        gradients: &Gradients,
        feature: usize,
    ) -> f32 {
        let (sum_grad, sum_hess) = features
            .row(feature)
            .iter()
            .zip(gradients.pairs())
            .fold((0.0f64, 0.0f64), |(g, h), (&x, pair)| {
                let x = x as f64;
                (g + pair.grad as f64 * x, h + pair.hess as f64 * x * x)
            });

        let delta = coordinate_delta(
            sum_grad,
            sum_hess,
            model.weight(feature) as f64,
            self.config.alpha,
            self.config.lambda,
        );
        (delta * self.config.learning_rate) as f32
    }

    /// Parallel round over contiguous blocks of features.
    ///
    /// Every block starts from the round's gradients and runs sequential coordinate
    /// descent on its own copy, refreshing it after each feature. The block deltas
    /// are then averaged, so the combined step is a convex combination of the block
    /// steps and cannot overshoot along directions shared by correlated features.
    /// The result only depends on `workers`, not on thread scheduling.
    ///
    /// Returns the non-zero `(feature, delta)` pairs so callers can update their
    /// predictions incrementally.
    pub fn shotgun_round(
        &self,
        model: &mut LinearModel,
        features: ArrayView2<'_, f32>,
        gradients: &Gradients,
    ) -> Vec<(usize, f32)> {
        let n_features = model.n_features();
        if n_features == 0 {
            return Vec::new();
        }
        let block_size = n_features.div_ceil(self.config.workers.clamp(1, n_features));
        let n_blocks = n_features.div_ceil(block_size);

        let deltas: Vec<(usize, f32)> = {
            let model = &*model;
            (0..n_blocks)
                .into_par_iter()
                .flat_map_iter(|block| {
                    let start = block * block_size;
                    let end = (start + block_size).min(n_features);
                    let mut local = gradients.clone();
                    let mut block_deltas = Vec::with_capacity(end - start);
                    for feature in start..end {
                        let delta = self.weight_delta(model, features, &local, feature);
                        if delta != 0.0 {
                            local.add_column(features.row(feature), delta);
                            block_deltas.push((feature, delta / n_blocks as f32));
                        }
                    }
                    block_deltas
                })
                .filter(|&(_, delta)| delta != 0.0)
                .collect()
        };

        for &(feature, delta) in &deltas {
            model.add_weight(feature, delta);
        }
        deltas
    }
}

/// Adds a bias delta to every prediction.
pub fn apply_bias_delta(delta: f32, mut predictions: ArrayViewMut1<'_, f32>) {
    if delta != 0.0 {
        predictions += delta;
    }
}

/// Adds `delta * x_feature` to every prediction for each `(feature, delta)` pair.
pub fn apply_weight_deltas(
    features: ArrayView2<'_, f32>,
    deltas: &[(usize, f32)],
    mut predictions: ArrayViewMut1<'_, f32>,
) {
    for &(feature, delta) in deltas {
        predictions.scaled_add(delta, &features.row(feature));
    }
}
