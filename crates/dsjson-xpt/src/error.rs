//! Error types for XPT file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing XPT files.
#[derive(Debug, Error)]
pub enum XptError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("invalid XPT file: {message}")]
    InvalidFormat { message: String },

    #[error("missing header: expected {expected}")]
    MissingHeader { expected: &'static str },

    #[error("invalid NAMESTR at index {index}: {message}")]
    InvalidNamestr { index: usize, message: String },

    #[error("dataset name must be 1-8 characters: '{name}'")]
    InvalidDatasetName { name: String },

    #[error("variable name must be 1-8 characters: '{name}'")]
    InvalidVariableName { name: String },

    #[error("duplicate variable name: {name}")]
    DuplicateVariable { name: String },

    #[error("row {row} has {actual} values, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("variable {name} has invalid length {length}")]
    InvalidLength { name: String, length: u16 },

    #[error("label for '{name}' exceeds 40 bytes")]
    LabelTooLong { name: String },

    #[error("format name '{format}' on '{name}' exceeds 8 bytes")]
    FormatNameTooLong { name: String, format: String },

    #[error("record out of bounds at offset {offset}")]
    RecordOutOfBounds { offset: usize },

    #[error("failed to parse numeric field: {field}")]
    NumericParse { field: String },

    #[error("observation length overflow")]
    ObservationOverflow,

    #[error("unexpected trailing bytes in observations")]
    TrailingBytes,

    #[error("dataset '{name}' not found in library")]
    DatasetNotFound { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for XPT operations.
pub type Result<T> = std::result::Result<T, XptError>;

impl XptError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn missing_header(expected: &'static str) -> Self {
        Self::MissingHeader { expected }
    }

    pub fn invalid_dataset_name(name: impl Into<String>) -> Self {
        Self::InvalidDatasetName { name: name.into() }
    }

    pub fn invalid_variable_name(name: impl Into<String>) -> Self {
        Self::InvalidVariableName { name: name.into() }
    }

    pub fn duplicate_variable(name: impl Into<String>) -> Self {
        Self::DuplicateVariable { name: name.into() }
    }
}
