use ndarray_npy::ReadNpyError;
use polars::prelude::PolarsError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpectoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Table error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Feature matrix error: {0}")]
    Npy(#[from] ReadNpyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Input shape mismatch: {0}")]
    InputShape(String),

    #[error("Invalid label at row {row}: log({value} + {pseudocount}) is undefined")]
    InvalidLabel {
        row: usize,
        value: f64,
        pseudocount: f64,
    },

    #[error("Column index {index} out of range for table with {width} columns")]
    ColumnIndex { index: usize, width: usize },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Trainer error: {0}")]
    Trainer(String),

    #[error("Invalid parameter: {name} = {value}, {message}")]
    InvalidParameter {
        name: String,
        value: String,
        message: String,
    },
}

/// Type alias for Result with ExpectoError
pub type Result<T> = std::result::Result<T, ExpectoError>;

impl ExpectoError {
    /// Create a new InputShape error
    pub fn input_shape(message: impl Into<String>) -> Self {
        ExpectoError::InputShape(message.into())
    }

    /// Create a new InvalidLabel error
    pub fn invalid_label(row: usize, value: f64, pseudocount: f64) -> Self {
        ExpectoError::InvalidLabel {
            row,
            value,
            pseudocount,
        }
    }

    /// Create a new InvalidParameter error
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        ExpectoError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}
