use expecto_rs::error::ExpectoError;
use expecto_rs::gblinear::train;
use expecto_rs::params::{BoosterParams, UpdaterKind};
use expecto_rs::types::{LabeledDataset, Labels};
use ndarray::Array2;

/// Three weakly correlated predictors per row, labels from `target`
fn synthetic(n: usize, offset: usize, target: impl Fn(&[f32]) -> f32) -> LabeledDataset {
    let features = Array2::from_shape_fn((n, 3), |(i, j)| {
        let i = (i + offset) as f32;
        match j {
            0 => (i * 1.3).sin(),
            1 => (i * 0.7).cos(),
            _ => ((i as usize * 37) % 11) as f32 / 5.0 - 1.0,
        }
    });
    let labels: Labels = features
        .rows()
        .into_iter()
        .map(|row| target(row.as_slice().unwrap()))
        .collect();
    LabeledDataset { features, labels }
}

/// `n_features` near-copies of one ramp, labels linear in the ramp
fn correlated(n: usize, n_features: usize) -> LabeledDataset {
    let features = Array2::from_shape_fn((n, n_features), |(i, j)| {
        let t = i as f32 / n as f32;
        t + 0.01 * (0.37 * i as f32 * (j + 1) as f32 + j as f32).sin()
    });
    let labels: Labels = (0..n).map(|i| 1.0 + 3.0 * i as f32 / n as f32).collect();
    LabeledDataset { features, labels }
}

fn linear_target(x: &[f32]) -> f32 {
    1.0 + 0.5 * x[0] - 0.3 * x[1] + 0.2 * x[2]
}

#[test]
fn test_shotgun_reduces_train_error() {
    let train_set = synthetic(200, 0, linear_target);
    let test_set = synthetic(50, 1000, linear_target);
    let params = BoosterParams {
        regularization_l2: 0.0,
        learning_rate: 0.3,
        thread_count: 2,
        max_rounds: 100,
        early_stopping_rounds: 0,
        ..Default::default()
    };

    let trained = train(&train_set, &test_set, &params).unwrap();
    assert_eq!(trained.rounds_run, 100);
    assert_eq!(trained.history.len(), 100);
    assert_eq!(trained.best_round, None);

    for pair in trained.history.windows(2) {
        assert!(pair[1].train_rmse <= pair[0].train_rmse + 1e-6);
    }
    let first = trained.history[0].train_rmse;
    let last = trained.history[99].train_rmse;
    assert!(last < 0.5 * first, "rmse went from {} to {}", first, last);
}

#[test]
fn test_shotgun_converges_on_correlated_columns() {
    let train_set = correlated(200, 40);
    let params = BoosterParams {
        regularization_l2: 0.0,
        learning_rate: 0.5,
        base_score: 0.0,
        thread_count: 4,
        max_rounds: 30,
        early_stopping_rounds: 0,
        ..Default::default()
    };

    let trained = train(&train_set, &train_set, &params).unwrap();
    assert!(trained.model.is_finite());
    for pair in trained.history.windows(2) {
        assert!(pair[1].train_rmse <= pair[0].train_rmse + 1e-5);
    }
    let first = trained.history[0].train_rmse;
    let last = trained.history[29].train_rmse;
    assert!(last < 0.25 * first, "rmse went from {} to {}", first, last);
}

#[test]
fn test_shotgun_default_regularization_on_correlated_columns() {
    let train_set = correlated(200, 200);
    let params = BoosterParams {
        max_rounds: 30,
        early_stopping_rounds: 0,
        ..Default::default()
    };

    let trained = train(&train_set, &train_set, &params).unwrap();
    let first = trained.history[0].train_rmse;
    assert!(trained.history.iter().all(|r| r.train_rmse <= first + 1e-5));
    assert!(trained.history[29].train_rmse < first);
}

#[test]
fn test_coord_descent_recovers_weights() {
    let train_set = synthetic(300, 0, linear_target);
    let test_set = synthetic(50, 1000, linear_target);
    let params = BoosterParams {
        regularization_l2: 0.0,
        learning_rate: 1.0,
        thread_count: 1,
        max_rounds: 300,
        early_stopping_rounds: 0,
        updater: UpdaterKind::CoordDescent,
        ..Default::default()
    };

    let trained = train(&train_set, &test_set, &params).unwrap();
    let weights = trained.model.weights();
    assert!((weights[0] - 0.5).abs() < 0.05);
    assert!((weights[1] + 0.3).abs() < 0.05);
    assert!((weights[2] - 0.2).abs() < 0.05);
    // base_score 2 plus learned bias lands on the intercept of 1
    assert!((trained.model.bias() + 1.0).abs() < 0.05);

    let last = trained.history.last().unwrap();
    assert!(last.train_rmse < 1e-2);
    assert!(last.test_rmse < 1e-2);
}

#[test]
fn test_l2_shrinks_weights() {
    let train_set = synthetic(200, 0, linear_target);
    let test_set = synthetic(20, 1000, linear_target);
    let base = BoosterParams {
        learning_rate: 0.5,
        thread_count: 1,
        max_rounds: 50,
        early_stopping_rounds: 0,
        updater: UpdaterKind::CoordDescent,
        ..Default::default()
    };

    let loose = train(&train_set, &test_set, &BoosterParams { regularization_l2: 0.0, ..base.clone() }).unwrap();
    let tight = train(&train_set, &test_set, &BoosterParams { regularization_l2: 10.0, ..base }).unwrap();

    let norm = |w: &ndarray::Array1<f32>| w.iter().map(|v| v * v).sum::<f32>();
    assert!(norm(tight.model.weights()) < norm(loose.model.weights()));
}

#[test]
fn test_early_stopping_on_diverging_test_set() {
    let train_set = synthetic(200, 0, |x| x[0]);
    let test_set = synthetic(50, 1000, |x| -x[0]);
    let params = BoosterParams {
        regularization_l2: 0.0,
        learning_rate: 0.3,
        base_score: 0.0,
        thread_count: 2,
        max_rounds: 100,
        early_stopping_rounds: 3,
        ..Default::default()
    };

    let trained = train(&train_set, &test_set, &params).unwrap();
    assert!(trained.rounds_run < 100);
    let best = trained.best_round.unwrap();
    assert_eq!(trained.rounds_run, best + 1 + 3);

    let best_rmse = trained.history[best].test_rmse;
    for record in &trained.history[best + 1..] {
        assert!(record.test_rmse >= best_rmse);
    }
}

#[test]
fn test_empty_training_set() {
    let empty = LabeledDataset {
        features: Array2::zeros((0, 3)),
        labels: Labels::zeros(0),
    };
    let test_set = synthetic(10, 0, linear_target);
    let result = train(&empty, &test_set, &BoosterParams::default());
    assert!(matches!(result, Err(ExpectoError::InputShape(_))));
}

#[test]
fn test_empty_test_set_falls_back_to_train_metric() {
    let train_set = synthetic(100, 0, linear_target);
    let empty = LabeledDataset {
        features: Array2::zeros((0, 3)),
        labels: Labels::zeros(0),
    };
    let params = BoosterParams {
        learning_rate: 0.3,
        regularization_l2: 0.0,
        thread_count: 1,
        max_rounds: 20,
        ..Default::default()
    };

    let trained = train(&train_set, &empty, &params).unwrap();
    assert!(trained.history.iter().all(|r| r.test_rmse.is_nan()));
    assert!(trained.best_round.is_some());
}

#[test]
fn test_invalid_params_rejected() {
    let train_set = synthetic(10, 0, linear_target);
    let params = BoosterParams {
        thread_count: 0,
        ..Default::default()
    };
    assert!(matches!(
        train(&train_set, &train_set, &params),
        Err(ExpectoError::InvalidParameter { .. })
    ));
}

#[test]
fn test_mismatched_predictor_counts() {
    let train_set = synthetic(10, 0, linear_target);
    let test_set = LabeledDataset {
        features: Array2::zeros((4, 2)),
        labels: Labels::zeros(4),
    };
    assert!(matches!(
        train(&train_set, &test_set, &BoosterParams::default()),
        Err(ExpectoError::InputShape(_))
    ));
}
