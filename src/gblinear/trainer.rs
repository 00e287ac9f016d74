//! Boosting loop for the linear booster.

use ndarray::{Array1, Array2};
use tracing::{debug, info, warn};

use crate::error::{ExpectoError, Result};
use crate::metrics::rmse;
use crate::params::{BoosterParams, UpdaterKind};
use crate::types::{EvalRecord, LabeledDataset};

use super::callback::EarlyStopping;
use super::model::{LinearModel, TrainedModel};
use super::updater::{apply_bias_delta, apply_weight_deltas, Gradients, UpdateConfig, Updater};

/// Trains a linear booster on `train`, evaluating on `test` after every round.
///
/// Each round first takes a Newton step on the bias, then updates the weights with
/// the configured coordinate descent variant. Predictions for both datasets are
/// maintained incrementally from the applied deltas.
///
/// Early stopping watches the test RMSE, or the train RMSE when the test set is
/// empty, and keeps the model from the best round.
///
/// The per-feature work runs in a dedicated pool of `params.thread_count` threads.
///
/// # Errors
/// * Returns `ExpectoError::InvalidParameter` if `params` fail validation
/// * Returns `ExpectoError::InputShape` if the training set is empty or the two
///   datasets disagree on the number of predictors
/// * Returns `ExpectoError::Trainer` if the thread pool cannot be built or the model
///   diverges to non-finite values
pub fn train(train: &LabeledDataset, test: &LabeledDataset, params: &BoosterParams) -> Result<TrainedModel> {
    params.validate()?;

    if train.n_samples() == 0 {
        return Err(ExpectoError::input_shape("training set is empty"));
    }
    if train.labels.len() != train.n_samples() || test.labels.len() != test.n_samples() {
        return Err(ExpectoError::input_shape("labels do not match feature rows"));
    }
    if test.n_samples() > 0 && test.n_features() != train.n_features() {
        return Err(ExpectoError::input_shape(format!(
            "train set has {} predictors but test set has {}",
            train.n_features(),
            test.n_features()
        )));
    }
    if test.n_samples() == 0 {
        warn!("test set is empty, early stopping falls back to the train metric");
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.thread_count)
        .build()
        .map_err(|e| ExpectoError::Trainer(e.to_string()))?;

    pool.install(|| boost(train, test, params))
}

fn boost(train: &LabeledDataset, test: &LabeledDataset, params: &BoosterParams) -> Result<TrainedModel> {
    let n_features = train.n_features();
    let base_score = params.base_score as f32;

    // Feature-major copies: each coordinate update walks one predictor across all rows.
    let train_cols: Array2<f32> = train.features.t().as_standard_layout().into_owned();
    let test_cols: Array2<f32> = test.features.t().as_standard_layout().into_owned();

    let updater = Updater::new(params.updater, UpdateConfig::from_params(params, train.n_samples()));
    let mut model = LinearModel::zeros(n_features);
    let mut gradients = Gradients::new(train.n_samples());
    let mut train_preds = Array1::from_elem(train.n_samples(), base_score);
    let mut test_preds = Array1::from_elem(test.n_samples(), base_score);

    let mut early_stopping = EarlyStopping::new(params.early_stopping_rounds);
    let mut best_model: Option<LinearModel> = None;
    let mut history = Vec::with_capacity(params.max_rounds);

    debug!(
        n_train = train.n_samples(),
        n_test = test.n_samples(),
        n_features,
        updater = %updater.kind(),
        "starting linear booster"
    );

    for round in 0..params.max_rounds {
        gradients.compute(train_preds.view(), train.labels.view());

        let bias_delta = updater.update_bias(&mut model, &gradients);
        if bias_delta != 0.0 {
            apply_bias_delta(bias_delta, train_preds.view_mut());
            apply_bias_delta(bias_delta, test_preds.view_mut());
            gradients.compute(train_preds.view(), train.labels.view());
        }

        match updater.kind() {
            UpdaterKind::Shotgun => {
                let deltas = updater.shotgun_round(&mut model, train_cols.view(), &gradients);
                apply_weight_deltas(train_cols.view(), &deltas, train_preds.view_mut());
                if test.n_samples() > 0 {
                    apply_weight_deltas(test_cols.view(), &deltas, test_preds.view_mut());
                }
            }
            UpdaterKind::CoordDescent => {
                for feature in 0..n_features {
                    let delta = updater.weight_delta(&model, train_cols.view(), &gradients, feature);
                    if delta == 0.0 {
                        continue;
                    }
                    model.add_weight(feature, delta);
                    let applied = [(feature, delta)];
                    apply_weight_deltas(train_cols.view(), &applied, train_preds.view_mut());
                    if test.n_samples() > 0 {
                        apply_weight_deltas(test_cols.view(), &applied, test_preds.view_mut());
                    }
                    gradients.add_column(train_cols.row(feature), delta);
                }
            }
        }

        if !model.is_finite() {
            return Err(ExpectoError::Trainer(format!(
                "model diverged to non-finite values at round {}",
                round
            )));
        }

        let record = EvalRecord {
            round,
            train_rmse: rmse(train_preds.view(), train.labels.view()),
            test_rmse: rmse(test_preds.view(), test.labels.view()),
        };
        info!(
            "[{}]\teval-rmse:{:.5}\ttrain-rmse:{:.5}",
            round, record.test_rmse, record.train_rmse
        );
        history.push(record);

        if early_stopping.is_enabled() {
            let monitored = if test.n_samples() > 0 {
                record.test_rmse
            } else {
                record.train_rmse
            };
            if early_stopping.record(monitored) {
                best_model = Some(model.clone());
            }
            if early_stopping.should_stop() {
                info!(
                    "stopping at round {}, best round {:?} with rmse {:?}",
                    round,
                    early_stopping.best_round(),
                    early_stopping.best_value()
                );
                break;
            }
        }
    }

    let rounds_run = history.len();
    let (model, best_round) = match best_model {
        Some(best) => (best, early_stopping.best_round()),
        None => (model, None),
    };

    Ok(TrainedModel {
        params: params.clone(),
        model,
        rounds_run,
        best_round,
        history,
    })
}
