//! Booster configuration.
//!
//! [`BoosterParams`] is built once at startup and passed by reference to the trainer.
//! Defaults mirror the command-line defaults of the training tool.

use crate::error::{ExpectoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of booster. Only the linear booster is supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoosterKind {
    #[default]
    Linear,
}

impl fmt::Display for BoosterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoosterKind::Linear => write!(f, "gblinear"),
        }
    }
}

/// Coordinate descent variant used for the weight updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdaterKind {
    /// Feature blocks descended in parallel, block steps averaged
    #[default]
    Shotgun,
    /// One feature at a time, gradients refreshed after every update
    CoordDescent,
}

impl fmt::Display for UpdaterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdaterKind::Shotgun => write!(f, "shotgun"),
            UpdaterKind::CoordDescent => write!(f, "coord_descent"),
        }
    }
}

/// Parameters for linear booster training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoosterParams {
    pub booster: BoosterKind,
    /// L1 regularization (alpha).
    pub regularization_l1: f64,
    /// L2 regularization (lambda).
    pub regularization_l2: f64,
    /// Step size applied to every bias and weight update (eta).
    pub learning_rate: f64,
    /// Global bias added to every prediction.
    pub base_score: f64,
    /// Worker threads for the per-feature updates.
    pub thread_count: usize,
    /// Upper bound on boosting rounds.
    pub max_rounds: usize,
    /// Stop once the test metric has not improved for this many rounds. 0 disables.
    pub early_stopping_rounds: usize,
    pub updater: UpdaterKind,
}

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            booster: BoosterKind::Linear,
            regularization_l1: 0.0,
            regularization_l2: 100.0,
            learning_rate: 0.01,
            base_score: 2.0,
            thread_count: 16,
            max_rounds: 100,
            early_stopping_rounds: 10,
            updater: UpdaterKind::Shotgun,
        }
    }
}

impl BoosterParams {
    /// Rejects configurations the trainer cannot run with.
    ///
    /// # Errors
    /// * Returns `ExpectoError::InvalidParameter` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ExpectoError::invalid_parameter(
                "learning_rate",
                self.learning_rate,
                "must be positive and finite",
            ));
        }
        if !(self.regularization_l1 >= 0.0 && self.regularization_l1.is_finite()) {
            return Err(ExpectoError::invalid_parameter(
                "regularization_l1",
                self.regularization_l1,
                "must be non-negative and finite",
            ));
        }
        if !(self.regularization_l2 >= 0.0 && self.regularization_l2.is_finite()) {
            return Err(ExpectoError::invalid_parameter(
                "regularization_l2",
                self.regularization_l2,
                "must be non-negative and finite",
            ));
        }
        if !self.base_score.is_finite() {
            return Err(ExpectoError::invalid_parameter(
                "base_score",
                self.base_score,
                "must be finite",
            ));
        }
        if self.thread_count == 0 {
            return Err(ExpectoError::invalid_parameter(
                "thread_count",
                self.thread_count,
                "must be at least 1",
            ));
        }
        if self.max_rounds == 0 {
            return Err(ExpectoError::invalid_parameter(
                "max_rounds",
                self.max_rounds,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
