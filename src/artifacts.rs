use crate::error::{ExpectoError, Result};
use crate::gblinear::{LinearModel, TrainedModel};
use crate::params::BoosterParams;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const FORMAT_VERSION: u32 = 1;

/// Paths of the two files written for a trained model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub save: PathBuf,
    pub dump: PathBuf,
}

/// Builds the parameter-encoded file stem for a run.
///
/// Numbers follow the Python-style names the stems have always used: shortest
/// round-trip digits, with a two-digit signed exponent below `1e-4`
/// (`pseudocount1e-05`). Integral values print without a fraction, so the
/// default run gives `lambda100` and `basescore2`; an explicit `--l2 100` gives
/// the same `lambda100` rather than `lambda100.0`.
///
/// # Returns
/// * `String` - `<output>.pseudocount<p>.lambda<l2>.round<r>.basescore<b>.<column>`
pub fn artifact_stem(output: &str, pseudocount: f64, params: &BoosterParams, column: &str) -> String {
    format!(
        "{}.pseudocount{}.lambda{}.round{}.basescore{}.{}",
        output,
        stem_number(pseudocount),
        stem_number(params.regularization_l2),
        params.max_rounds,
        stem_number(params.base_score),
        column
    )
}

fn stem_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        return value.to_string();
    }
    let shortest = format!("{:?}", value);
    match shortest.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.unsigned_abs()
            ),
            Err(_) => shortest,
        },
        None => shortest,
    }
}

/// Returns the `.save` and `.dump` paths for a file stem
pub fn artifact_paths(stem: &str) -> ArtifactPaths {
    ArtifactPaths {
        save: PathBuf::from(format!("{}.save", stem)),
        dump: PathBuf::from(format!("{}.dump", stem)),
    }
}

/// On-disk form of a trained model
#[derive(Debug, Serialize, Deserialize)]
struct SavedModel {
    format_version: u32,
    booster: String,
    params: BoosterParams,
    base_score: f64,
    bias: f32,
    weights: Vec<f32>,
    rounds_run: usize,
    best_round: Option<usize>,
}

/// Writes a reloadable JSON representation of the model.
///
/// Existing files are overwritten.
///
/// # Errors
/// * Returns `ExpectoError::Io` for file writing issues
/// * Returns `ExpectoError::Serialization` if encoding fails
pub fn save_model(trained: &TrainedModel, path: impl AsRef<Path>) -> Result<()> {
    let saved = SavedModel {
        format_version: FORMAT_VERSION,
        booster: trained.params.booster.to_string(),
        params: trained.params.clone(),
        base_score: trained.params.base_score,
        bias: trained.model.bias(),
        weights: trained.model.weights().to_vec(),
        rounds_run: trained.rounds_run,
        best_round: trained.best_round,
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &saved)?;
    writer.flush()?;
    Ok(())
}

/// Reads a model written by [`save_model`].
///
/// The per-round evaluation history is not stored, so the loaded model has none.
///
/// # Errors
/// * Returns `ExpectoError::Io` if the file cannot be opened
/// * Returns `ExpectoError::Serialization` if the content is not a saved model
/// * Returns `ExpectoError::InvalidFileFormat` for an unknown format version
pub fn load_model(path: impl AsRef<Path>) -> Result<TrainedModel> {
    let reader = BufReader::new(File::open(path)?);
    let saved: SavedModel = serde_json::from_reader(reader)?;

    if saved.format_version != FORMAT_VERSION {
        return Err(ExpectoError::InvalidFileFormat(format!(
            "unsupported model format version {}",
            saved.format_version
        )));
    }

    Ok(TrainedModel {
        params: saved.params,
        model: LinearModel::from_parts(Array1::from(saved.weights), saved.bias),
        rounds_run: saved.rounds_run,
        best_round: saved.best_round,
        history: Vec::new(),
    })
}

/// Renders the human-readable linear booster dump.
///
/// Layout: a `booster[0]:` header, the bias under `bias:`, then one weight per
/// predictor under `weight:`.
pub fn dump_text(model: &LinearModel) -> String {
    let mut out = String::from("booster[0]:\nbias:\n");
    let _ = writeln!(out, "{}", model.bias());
    out.push_str("weight:\n");
    for weight in model.weights() {
        let _ = writeln!(out, "{}", weight);
    }
    out
}

/// Writes the text dump of the model. Existing files are overwritten.
pub fn dump_model(trained: &TrainedModel, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, dump_text(&trained.model))?;
    Ok(())
}

/// Writes both artifacts for `stem`, creating the parent directory if needed.
///
/// # Errors
/// * Returns `ExpectoError::Io` for directory creation or file writing issues
/// * Returns `ExpectoError::Serialization` if the model cannot be encoded
pub fn write_artifacts(trained: &TrainedModel, stem: &str) -> Result<ArtifactPaths> {
    let paths = artifact_paths(stem);

    if let Some(parent) = paths.save.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    save_model(trained, &paths.save)?;
    dump_model(trained, &paths.dump)?;

    info!(save = %paths.save.display(), dump = %paths.dump.display(), "wrote model artifacts");
    Ok(paths)
}
