//! Error types for the rarefy library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum RareError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid number '{value}' at row {row}, column {col}")]
    Parse {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Shape mismatch at row {row}: expected {expected} columns, got {actual}")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
        row: usize,
    },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, RareError>;
