//! Error types for the data layer.

use std::path::PathBuf;

use arrow::datatypes::DataType;
use thiserror::Error;

/// Errors raised while loading tables or deriving views from them.
#[derive(Error, Debug)]
pub enum DataError {
    /// No regular file exists for the requested dataset.
    #[error("dataset file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// The file exists but is not a validly formatted table.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The file extension is not one we know how to read.
    #[error("unsupported file format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// IO error other than "not found" while reading a dataset file.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An expected column is absent from a loaded table.
    #[error("missing column '{column}' (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// The column exists but holds values of the wrong kind for the derivation.
    #[error("column '{column}' has type {data_type:?}, expected a numeric column")]
    InvalidColumn { column: String, data_type: DataType },
}

/// Result type alias for data operations.
pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    pub(crate) fn parse(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        DataError::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            DataError::FileNotFound { path }
        } else {
            DataError::Io { path, source }
        }
    }

    /// Whether this error means the dataset file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::FileNotFound { .. })
    }
}
