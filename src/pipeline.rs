//! End-to-end training run: load, partition, transform labels, train, write.

use crate::artifacts::{artifact_stem, write_artifacts, ArtifactPaths};
use crate::error::Result;
use crate::gblinear::{self, TrainedModel};
use crate::labels::{transform_labels, DEFAULT_PSEUDOCOUNT};
use crate::loader::{
    check_row_counts, expression_column, read_feature_matrix, read_table, DEFAULT_ANNOTATION_FILE,
    DEFAULT_FEATURE_FILE,
};
use crate::metrics::spearman;
use crate::params::BoosterParams;
use crate::partition::{partition_annotation, selected_rows};
use crate::types::{FeatureMatrix, LabeledDataset};
use ndarray::Axis;
use std::path::PathBuf;
use tracing::info;

/// Everything a training run needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub feature_file: PathBuf,
    pub annotation_file: PathBuf,
    pub expression_file: PathBuf,
    /// 0-based position of the expression column to train on
    pub target_index: usize,
    /// Prefix of the artifact file names
    pub output: String,
    pub pseudocount: f64,
    pub booster: BoosterParams,
}

impl RunConfig {
    /// Config with default input locations, pseudocount and booster parameters
    pub fn new(expression_file: impl Into<PathBuf>, target_index: usize, output: impl Into<String>) -> Self {
        Self {
            feature_file: PathBuf::from(DEFAULT_FEATURE_FILE),
            annotation_file: PathBuf::from(DEFAULT_ANNOTATION_FILE),
            expression_file: expression_file.into(),
            target_index,
            output: output.into(),
            pseudocount: DEFAULT_PSEUDOCOUNT,
            booster: BoosterParams::default(),
        }
    }
}

/// Outcome of a training run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub column_name: String,
    pub n_train: usize,
    pub n_test: usize,
    pub trained: TrainedModel,
    /// Spearman correlation of test predictions with test labels, NaN if undefined
    pub test_spearman: f64,
    pub artifacts: ArtifactPaths,
}

/// Train and test datasets for one expression column
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub column_name: String,
    pub train: LabeledDataset,
    pub test: LabeledDataset,
}

/// Loads the inputs and builds the chromosome-holdout train and test datasets.
///
/// # Errors
/// * Returns `ExpectoError::InputShape` if the three inputs disagree on row count
/// * Returns `ExpectoError::ColumnIndex` if `target_index` is out of range
/// * Returns `ExpectoError::MissingColumn` if the annotation lacks `seqnames`
/// * Returns `ExpectoError::InvalidLabel` if a selected expression value cannot be
///   log-transformed
/// * Returns loader errors for unreadable inputs
pub fn prepare_data(config: &RunConfig) -> Result<PreparedData> {
    let features = read_feature_matrix(&config.feature_file)?;
    let annotation = read_table(&config.annotation_file)?;
    let expression = read_table(&config.expression_file)?;
    check_row_counts(&features, &annotation, &expression)?;

    let column = expression_column(&expression, config.target_index)?;
    let partition = partition_annotation(&annotation)?;

    info!(
        column = %column.name,
        n_rows = partition.len(),
        n_train = partition.n_train(),
        n_test = partition.n_test(),
        "partitioned rows by chromosome"
    );

    let train = labeled_subset(&features, &column.values, &partition.train, config.pseudocount)?;
    let test = labeled_subset(&features, &column.values, &partition.test, config.pseudocount)?;

    Ok(PreparedData {
        column_name: column.name,
        train,
        test,
    })
}

fn labeled_subset(
    features: &FeatureMatrix,
    values: &[Option<f64>],
    mask: &[bool],
    pseudocount: f64,
) -> Result<LabeledDataset> {
    let labels = transform_labels(values, mask, pseudocount)?;
    let features = features.select(Axis(0), &selected_rows(mask));
    Ok(LabeledDataset { features, labels })
}

/// Runs the whole pipeline and writes the `.save` and `.dump` artifacts.
///
/// Booster parameters are validated before any input is read.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    config.booster.validate()?;

    let data = prepare_data(config)?;
    let trained = gblinear::train(&data.train, &data.test, &config.booster)?;

    let test_preds = trained.predict(data.test.features.view());
    let test_spearman = spearman(&test_preds.to_vec(), &data.test.labels.to_vec());
    info!(
        rounds = trained.rounds_run,
        best_round = ?trained.best_round,
        test_spearman,
        "training finished"
    );

    let stem = artifact_stem(&config.output, config.pseudocount, &config.booster, &data.column_name);
    let artifacts = write_artifacts(&trained, &stem)?;

    Ok(RunSummary {
        column_name: data.column_name,
        n_train: data.train.n_samples(),
        n_test: data.test.n_samples(),
        trained,
        test_spearman,
        artifacts,
    })
}
