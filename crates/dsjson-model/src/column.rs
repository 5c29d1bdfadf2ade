//! Column (item/variable) definition.

use serde::{Deserialize, Serialize};

/// Semantic type tags recognised by the converters.
///
/// The column itself keeps its type as free text because Define-XML supplies
/// its own vocabulary (`text`, `integer`, `float`, `date`, ...); this enum is
/// the classification the writers need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
    Other,
}

impl ColumnType {
    /// Classify a Dataset-JSON or Define-XML data type string.
    pub fn classify(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Self::String,
            "integer" => Self::Integer,
            "float" | "double" | "decimal" => Self::Float,
            "boolean" => Self::Boolean,
            _ => Self::Other,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// One variable of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub oid: String,
    pub name: String,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub data_type: String,
    pub length: Option<u32>,
    pub format: Option<String>,
}

impl Column {
    pub fn new(
        oid: impl Into<String>,
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            oid: oid.into(),
            name: name.into(),
            label: None,
            data_type: data_type.into(),
            length: None,
            format: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::classify(&self.data_type)
    }
}
