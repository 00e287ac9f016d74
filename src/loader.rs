use crate::error::{ExpectoError, Result};
use crate::types::FeatureMatrix;
use ndarray::Array2;
use ndarray_npy::{read_npy, ReadNpyError};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Default location of the precomputed feature matrix
pub const DEFAULT_FEATURE_FILE: &str = "./resources/Xreducedall.2002.npy";

/// Default location of the gene annotation table
pub const DEFAULT_ANNOTATION_FILE: &str = "./resources/geneanno.csv";

/// One expression measurement selected from the expression table
#[derive(Debug, Clone)]
pub struct ExpressionColumn {
    /// Header text of the column
    pub name: String,
    /// One value per row, `None` where the table has no value
    pub values: Vec<Option<f64>>,
}

/// Reads the feature matrix from a `.npy` or header-less `.csv` file.
///
/// `.npy` files may hold float32 or float64 data; both are returned as float32.
///
/// # Errors
/// * Returns `ExpectoError::Npy` if the `.npy` file is not a 2-D float array
/// * Returns `ExpectoError::Polars` if the CSV file cannot be parsed
/// * Returns `ExpectoError::InvalidFileFormat` for other extensions or non-numeric CSV data
pub fn read_feature_matrix(path: impl AsRef<Path>) -> Result<FeatureMatrix> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let matrix = match extension.as_deref() {
        Some("npy") => read_npy_matrix(path)?,
        Some("csv") => read_csv_matrix(path)?,
        _ => {
            return Err(ExpectoError::InvalidFileFormat(format!(
                "unsupported feature matrix file {}, expected .npy or .csv",
                path.display()
            )))
        }
    };

    debug!(
        path = %path.display(),
        rows = matrix.nrows(),
        cols = matrix.ncols(),
        "loaded feature matrix"
    );
    Ok(matrix)
}

fn read_npy_matrix(path: &Path) -> Result<FeatureMatrix> {
    match read_npy::<_, Array2<f32>>(path) {
        Ok(matrix) => Ok(matrix),
        Err(ReadNpyError::WrongDescriptor(_)) => {
            let matrix: Array2<f64> = read_npy(path)?;
            Ok(matrix.mapv(|v| v as f32))
        }
        Err(e) => Err(e.into()),
    }
}

fn read_csv_matrix(path: &Path) -> Result<FeatureMatrix> {
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_infer_schema_length(None)
        .finish()?
        .collect()?;

    let mut matrix = FeatureMatrix::zeros((df.height(), df.width()));
    for (j, column) in df.get_columns().iter().enumerate() {
        let values = column.cast(&DataType::Float32).map_err(|_| {
            ExpectoError::InvalidFileFormat(format!("non-numeric feature column {}", j))
        })?;
        for (i, value) in values.f32()?.into_iter().enumerate() {
            matrix[[i, j]] = value.ok_or_else(|| {
                ExpectoError::InvalidFileFormat(format!("missing feature value at row {}, column {}", i, j))
            })?;
        }
    }

    Ok(matrix)
}

/// Reads a comma-separated table with a header row into a DataFrame.
///
/// The schema is inferred from the whole file so that integer-looking prefixes do not
/// pin a numeric column to an integer type.
pub fn read_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(None)
        .finish()?
        .collect()?;

    debug!(path = %path.display(), rows = df.height(), cols = df.width(), "loaded table");
    Ok(df)
}

/// Selects an expression column by 0-based position over all table columns.
///
/// The index is validated before use and the column is then bound by its header name.
///
/// # Errors
/// * Returns `ExpectoError::ColumnIndex` if `index` is out of range
/// * Returns `ExpectoError::InvalidFileFormat` if the column is not numeric
pub fn expression_column(table: &DataFrame, index: usize) -> Result<ExpressionColumn> {
    let width = table.width();
    let name = table
        .get_column_names()
        .get(index)
        .map(|name| name.to_string())
        .ok_or(ExpectoError::ColumnIndex { index, width })?;

    let values = table
        .column(&name)?
        .cast(&DataType::Float64)
        .map_err(|_| ExpectoError::InvalidFileFormat(format!("expression column {} is not numeric", name)))?;
    let values: Vec<Option<f64>> = values.f64()?.into_iter().collect();

    Ok(ExpressionColumn { name, values })
}

/// Checks that the feature matrix, annotation and expression tables describe the same rows.
///
/// # Errors
/// * Returns `ExpectoError::InputShape` naming all three row counts if they disagree
pub fn check_row_counts(features: &FeatureMatrix, annotation: &DataFrame, expression: &DataFrame) -> Result<()> {
    let (n_features, n_annotation, n_expression) = (features.nrows(), annotation.height(), expression.height());
    if n_features != n_annotation || n_features != n_expression {
        return Err(ExpectoError::input_shape(format!(
            "feature matrix has {} rows, annotation has {}, expression table has {}",
            n_features, n_annotation, n_expression
        )));
    }
    Ok(())
}
