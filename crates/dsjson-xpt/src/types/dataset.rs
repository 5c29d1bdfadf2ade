//! Dataset (member) and library containers.

use crate::header::LibraryInfo;

use super::{XptColumn, XptValue};

/// One member of a transport library.
#[derive(Debug, Clone, PartialEq)]
pub struct XptDataset {
    pub name: String,
    pub label: Option<String>,
    pub dataset_type: Option<String>,
    pub columns: Vec<XptColumn>,
    pub rows: Vec<Vec<XptValue>>,
}

impl XptDataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            dataset_type: None,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_columns(name: impl Into<String>, columns: Vec<XptColumn>) -> Self {
        Self {
            columns,
            ..Self::new(name)
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, dataset_type: impl Into<String>) -> Self {
        self.dataset_type = Some(dataset_type.into());
        self
    }

    pub fn add_row(&mut self, row: Vec<XptValue>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Label written to the member header (empty when unset).
    #[must_use]
    pub fn effective_label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    /// Total width of one observation in bytes.
    #[must_use]
    pub fn observation_length(&self) -> usize {
        self.columns.iter().map(|c| c.length as usize).sum()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// A transport library: file-level header plus its members in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XptLibrary {
    pub info: LibraryInfo,
    pub datasets: Vec<XptDataset>,
}

impl XptLibrary {
    #[must_use]
    pub fn new(datasets: Vec<XptDataset>) -> Self {
        Self {
            info: LibraryInfo::default(),
            datasets,
        }
    }

    pub fn get(&self, name: &str) -> Option<&XptDataset> {
        self.datasets
            .iter()
            .find(|ds| ds.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, XptDataset> {
        self.datasets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl IntoIterator for XptLibrary {
    type Item = XptDataset;
    type IntoIter = std::vec::IntoIter<XptDataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.into_iter()
    }
}
