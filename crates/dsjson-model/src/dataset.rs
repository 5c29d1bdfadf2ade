//! Dataset (item group) definition.

use indexmap::IndexMap;
use serde::Serialize;

use crate::column::Column;
use crate::error::{ModelError, Result};

/// One dataset of a document, e.g. the `DM` or `AE` domain.
///
/// Columns are kept in discovery order and keyed by their name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub oid: String,
    pub name: String,
    pub label: Option<String>,
    columns: IndexMap<String, Column>,
}

impl Dataset {
    pub fn new(oid: impl Into<String>, name: impl Into<String>, label: Option<String>) -> Self {
        Self {
            oid: oid.into(),
            name: name.into(),
            label,
            columns: IndexMap::new(),
        }
    }

    /// Merge columns into the mapping, keyed by column name.
    ///
    /// This is the only way columns enter a dataset. Names must be non-empty
    /// and unique; on error the dataset is left unchanged.
    pub fn append_columns<I>(&mut self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = Column>,
    {
        let mut staged: IndexMap<String, Column> = IndexMap::new();
        for column in columns {
            if column.name.is_empty() {
                return Err(ModelError::EmptyColumnName {
                    dataset: self.name.clone(),
                    oid: column.oid,
                });
            }
            if self.columns.contains_key(&column.name) || staged.contains_key(&column.name) {
                return Err(ModelError::DuplicateColumn {
                    dataset: self.name.clone(),
                    name: column.name,
                });
            }
            staged.insert(column.name.clone(), column);
        }
        self.columns.extend(staged);
        Ok(())
    }

    /// Builder form of [`Dataset::append_columns`].
    pub fn with_columns<I>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = Column>,
    {
        self.append_columns(columns)?;
        Ok(self)
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column in discovery order.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dm() -> Dataset {
        Dataset::new("IG.DM", "DM", Some("Demographics".to_string()))
    }

    #[test]
    fn append_preserves_discovery_order() {
        let dataset = dm()
            .with_columns([
                Column::new("IT.USUBJID", "USUBJID", "string"),
                Column::new("IT.AGE", "AGE", "integer"),
                Column::new("IT.SEX", "SEX", "string"),
            ])
            .unwrap();
        assert_eq!(dataset.column_names(), vec!["USUBJID", "AGE", "SEX"]);
        assert_eq!(dataset.column_index("AGE"), Some(1));
        assert_eq!(dataset.get_column("SEX").unwrap().oid, "IT.SEX");
        assert!(dataset.get_column("RACE").is_none());
    }

    #[test]
    fn duplicate_name_is_rejected_atomically() {
        let mut dataset = dm();
        dataset
            .append_columns([Column::new("IT.AGE", "AGE", "integer")])
            .unwrap();
        let err = dataset
            .append_columns([
                Column::new("IT.SEX", "SEX", "string"),
                Column::new("IT.AGE2", "AGE", "integer"),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateColumn {
                dataset: "DM".to_string(),
                name: "AGE".to_string()
            }
        );
        assert_eq!(dataset.column_names(), vec!["AGE"]);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = dm()
            .with_columns([Column::new("IT.X", "", "string")])
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyColumnName { .. }));
    }
}
