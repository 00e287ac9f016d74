//! Linear booster training.
//!
//! The booster fits `prediction = base_score + bias + Σ w_j x_j` to squared-error
//! targets by boosting rounds of regularized coordinate descent:
//!
//! - [`LinearModel`]: weights and bias
//! - [`Updater`]: bias and elastic-net weight updates, shotgun or sequential
//! - [`EarlyStopping`]: patience on the held-out metric
//! - [`train`]: the boosting loop, returning a [`TrainedModel`]

mod callback;
mod model;
mod trainer;
mod updater;

pub use callback::EarlyStopping;
pub use model::{LinearModel, TrainedModel};
pub use trainer::train;
pub use updater::{coordinate_delta, GradientPair, Gradients, UpdateConfig, Updater};
