//! Error types for conversions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, projecting or writing a dataset.
///
/// Every variant is fatal for the document or dataset being converted.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed Dataset-JSON document: {source}")]
    MalformedDocument {
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset {name} not found under key {key}")]
    DatasetNotFound { name: String, key: String },

    #[error("dataset {dataset} has no ITEMGROUPDATASEQ item")]
    MissingSequence { dataset: String },

    #[error("dataset {dataset}, record {row}: expected {expected} values, found {actual}")]
    RowLength {
        dataset: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("dataset {dataset}, record {row}, column {column}: {reason}")]
    InvalidValue {
        dataset: String,
        column: String,
        row: usize,
        reason: String,
    },

    #[error("destination folder {path} does not exist")]
    DestinationNotFound { path: PathBuf },

    #[error(transparent)]
    Model(#[from] dsjson_model::ModelError),

    #[error("XPT error: {0}")]
    Xpt(#[from] dsjson_xpt::XptError),

    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
