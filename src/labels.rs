use crate::error::{ExpectoError, Result};
use crate::types::Labels;

/// Default constant added to expression values before taking the logarithm
pub const DEFAULT_PSEUDOCOUNT: f64 = 0.0001;

/// Log-transforms a single expression value.
///
/// # Errors
/// * Returns `ExpectoError::InvalidLabel` when `value + pseudocount` is not strictly
///   positive, either input is NaN, or the sum is infinite
pub fn log_label(row: usize, value: f64, pseudocount: f64) -> Result<f64> {
    let shifted = value + pseudocount;
    // NaN compares false here, so it falls through to the error.
    if shifted > 0.0 && shifted.is_finite() {
        Ok(shifted.ln())
    } else {
        Err(ExpectoError::invalid_label(row, value, pseudocount))
    }
}

/// Builds the label vector `log(value + pseudocount)` for every row selected by `mask`.
///
/// Labels come out in original row order: the i-th label belongs to the i-th `true`
/// entry of the mask. Missing values are rejected the same way as non-positive ones.
///
/// # Arguments
/// * `values` - One expression value per row, `None` for missing entries
/// * `mask` - Row selection, same length as `values`
/// * `pseudocount` - Constant added before the logarithm
///
/// # Errors
/// * Returns `ExpectoError::InputShape` if `mask` and `values` differ in length
/// * Returns `ExpectoError::InvalidLabel` for the first selected row whose value cannot
///   be transformed
pub fn transform_labels(values: &[Option<f64>], mask: &[bool], pseudocount: f64) -> Result<Labels> {
    if values.len() != mask.len() {
        return Err(ExpectoError::input_shape(format!(
            "mask has {} rows but expression column has {}",
            mask.len(),
            values.len()
        )));
    }

    let labels = values
        .iter()
        .zip(mask)
        .enumerate()
        .filter(|(_, (_, keep))| **keep)
        .map(|(row, (value, _))| {
            let value = value.unwrap_or(f64::NAN);
            log_label(row, value, pseudocount).map(|label| label as f32)
        })
        .collect::<Result<Vec<f32>>>()?;

    Ok(Labels::from(labels))
}
