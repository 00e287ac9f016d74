use ndarray::{Array1, ArrayView2};

use crate::params::BoosterParams;
use crate::types::EvalRecord;

/// Linear booster model: one weight per predictor plus a learned bias.
///
/// The bias is learned on top of the configured base score, which is kept outside
/// the model and stored with the training parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    weights: Array1<f32>,
    bias: f32,
}

impl LinearModel {
    /// Create a zero-initialized linear model.
    pub fn zeros(n_features: usize) -> Self {
        Self {
            weights: Array1::zeros(n_features),
            bias: 0.0,
        }
    }

    pub fn from_parts(weights: Array1<f32>, bias: f32) -> Self {
        Self { weights, bias }
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn weight(&self, feature: usize) -> f32 {
        self.weights[feature]
    }

    #[inline]
    pub fn add_weight(&mut self, feature: usize, delta: f32) {
        self.weights[feature] += delta;
    }

    pub fn weights(&self) -> &Array1<f32> {
        &self.weights
    }

    #[inline]
    pub fn bias(&self) -> f32 {
        self.bias
    }

    #[inline]
    pub fn add_bias(&mut self, delta: f32) {
        self.bias += delta;
    }

    pub fn is_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }

    /// Raw margins `base_score + bias + x · w` for every row of `features`.
    pub fn predict(&self, features: ArrayView2<'_, f32>, base_score: f32) -> Array1<f32> {
        features.dot(&self.weights) + (base_score + self.bias)
    }
}

/// Result of a training run: the model, the configuration it was trained with and
/// its per-round evaluation history.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub params: BoosterParams,
    pub model: LinearModel,
    /// Rounds actually run, at most `params.max_rounds`.
    pub rounds_run: usize,
    /// Round whose model was kept when early stopping was active.
    pub best_round: Option<usize>,
    pub history: Vec<EvalRecord>,
}

impl TrainedModel {
    pub fn predict(&self, features: ArrayView2<'_, f32>) -> Array1<f32> {
        self.model.predict(features, self.params.base_score as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn predict_adds_base_score_and_bias() {
        let model = LinearModel::from_parts(array![0.5, -1.0], 0.25);
        let features = array![[2.0, 1.0], [0.0, 0.0]];
        let preds = model.predict(features.view(), 2.0);
        assert_eq!(preds, array![2.0 + 0.25 + 1.0 - 1.0, 2.25]);
    }

    #[test]
    fn zeros_has_no_effect_beyond_base_score() {
        let model = LinearModel::zeros(3);
        let features = array![[1.0, 2.0, 3.0]];
        assert_eq!(model.predict(features.view(), 1.5), array![1.5]);
        assert!(model.is_finite());
    }
}
