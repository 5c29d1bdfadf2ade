use thiserror::Error;

/// Errors raised when a dataset's column mapping would break its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("dataset {dataset}: column name must not be empty (OID {oid})")]
    EmptyColumnName { dataset: String, oid: String },
    #[error("dataset {dataset}: duplicate column name {name}")]
    DuplicateColumn { dataset: String, name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
