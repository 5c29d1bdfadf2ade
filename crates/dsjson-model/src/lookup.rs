//! Name-based lookup over a document's datasets.

use crate::column::Column;
use crate::dataset::Dataset;

/// Read-only access to the datasets owned by a parsed document.
///
/// Lookups scan by name and return `None` when nothing matches; callers that
/// require the value decide whether a miss is an error.
pub trait DatasetCollection {
    fn datasets(&self) -> &[Dataset];

    fn dataset_names(&self) -> Vec<&str> {
        self.datasets().iter().map(|ds| ds.name.as_str()).collect()
    }

    fn get_dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets().iter().find(|ds| ds.name == name)
    }

    fn get_column(&self, dataset: &str, column: &str) -> Option<&Column> {
        self.get_dataset(dataset)?.get_column(column)
    }

    fn column_names(&self, dataset: &str) -> Option<Vec<&str>> {
        self.get_dataset(dataset).map(Dataset::column_names)
    }
}
