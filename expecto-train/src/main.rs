use clap::{Parser, ValueEnum};
use expecto_rs::error::ExpectoError;
use expecto_rs::loader::{DEFAULT_ANNOTATION_FILE, DEFAULT_FEATURE_FILE};
use expecto_rs::params::{BoosterKind, BoosterParams, UpdaterKind};
use expecto_rs::pipeline::{run, RunConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "expecto-train",
    about = "Trains a linear booster expression model with a chromosome holdout split",
    long_about = "Trains a sequence-based expression model for one expression profile. \
                  The profile is the targetIndex-th column of the expression file; its values \
                  can be log RPKM from RNA-seq, log CAGE counts or normalized microarray scores. \
                  Rows of the feature matrix must match the genes or TSSes of the annotation file. \
                  chr8 is held out for evaluation, chrX and chrY are left out of training.",
    version,
    after_help = "Example usage:\n    \
                  expecto-train --expFile ./resources/geneanno.exp.csv --targetIndex 1 --output model.adipose",
    color = clap::ColorChoice::Always
)]
#[derive(Debug)]
struct Args {
    /// Expression table (CSV with header), one row per gene/TSS
    #[arg(long = "expFile", value_name = "EXP_FILE")]
    exp_file: PathBuf,

    /// 0-based column of the expression table to train on
    #[arg(long = "targetIndex")]
    target_index: usize,

    /// Prefix for the .save and .dump output files
    #[arg(long = "output")]
    output: String,

    /// Feature matrix (.npy or header-less .csv), rows aligned with the annotation
    #[arg(long = "inputFile", default_value = DEFAULT_FEATURE_FILE)]
    input_file: PathBuf,

    /// Gene annotation table with a seqnames column
    #[arg(long = "annoFile", default_value = DEFAULT_ANNOTATION_FILE)]
    anno_file: PathBuf,

    /// Added to expression values before the log transform
    #[arg(long = "pseudocount", default_value = "0.0001")]
    pseudocount: f64,

    /// Maximum number of boosting rounds
    #[arg(long = "num_round", default_value = "100")]
    num_round: usize,

    /// L2 regularization
    #[arg(long = "l2", default_value = "100")]
    l2: f64,

    /// L1 regularization
    #[arg(long = "l1", default_value = "0")]
    l1: f64,

    /// Learning rate
    #[arg(long = "eta", default_value = "0.01")]
    eta: f64,

    /// Initial prediction for every row
    #[arg(long = "base_score", default_value = "2")]
    base_score: f64,

    /// Trainer threads
    #[arg(long = "threads", default_value = "16")]
    threads: usize,

    /// Stop after this many rounds without test improvement, 0 disables
    #[arg(long = "early_stopping_rounds", default_value = "10")]
    early_stopping_rounds: usize,

    /// Coordinate descent variant
    #[arg(long = "updater", value_enum, default_value = "shotgun")]
    updater: UpdaterArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum UpdaterArg {
    Shotgun,
    CoordDescent,
}

impl From<UpdaterArg> for UpdaterKind {
    fn from(arg: UpdaterArg) -> Self {
        match arg {
            UpdaterArg::Shotgun => UpdaterKind::Shotgun,
            UpdaterArg::CoordDescent => UpdaterKind::CoordDescent,
        }
    }
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        RunConfig {
            feature_file: args.input_file,
            annotation_file: args.anno_file,
            expression_file: args.exp_file,
            target_index: args.target_index,
            output: args.output,
            pseudocount: args.pseudocount,
            booster: BoosterParams {
                booster: BoosterKind::Linear,
                regularization_l1: args.l1,
                regularization_l2: args.l2,
                learning_rate: args.eta,
                base_score: args.base_score,
                thread_count: args.threads,
                max_rounds: args.num_round,
                early_stopping_rounds: args.early_stopping_rounds,
                updater: args.updater.into(),
            },
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn train(config: &RunConfig) -> Result<(), ExpectoError> {
    let start_time = std::time::Instant::now();
    let summary = run(config)?;

    info!(
        "trained on {} rows, evaluated on {} rows of {}; test spearman {:.4}",
        summary.n_train, summary.n_test, summary.column_name, summary.test_spearman
    );
    info!("model written to {}", summary.artifacts.save.display());
    info!(
        "total execution time: {:.4} minutes",
        start_time.elapsed().as_secs_f64() / 60.0
    );

    Ok(())
}

fn main() -> ExitCode {
    let config = RunConfig::from(Args::parse());
    init_logging();

    match train(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updater_flag_maps_to_updater_kind() {
        let args = Args::try_parse_from([
            "expecto-train",
            "--expFile",
            "exp.csv",
            "--targetIndex",
            "1",
            "--output",
            "model",
            "--updater",
            "coord_descent",
        ])
        .unwrap();
        let config = RunConfig::from(args);
        assert_eq!(config.booster.updater, UpdaterKind::CoordDescent);
        assert_eq!(config.booster.regularization_l2, 100.0);

        let args = Args::try_parse_from([
            "expecto-train",
            "--expFile",
            "exp.csv",
            "--targetIndex",
            "1",
            "--output",
            "model",
        ])
        .unwrap();
        assert_eq!(RunConfig::from(args).booster.updater, UpdaterKind::Shotgun);
    }
}
