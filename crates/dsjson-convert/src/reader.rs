//! Dataset-JSON reader.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use dsjson_model::{Column, Dataset, DatasetCollection, join_prefixed};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ConvertError, Result};
use crate::schema::{DatasetJson, ItemGroupData};

/// A parsed Dataset-JSON document and the datasets built from it.
///
/// Item groups are looked up under `join_prefixed(item_group_prefix, name)`,
/// so a document keyed `IG.DM` is read with the prefix `IG`.
#[derive(Debug, Clone)]
pub struct DatasetJsonReader {
    path: Option<PathBuf>,
    modified: Option<SystemTime>,
    item_group_prefix: String,
    document: DatasetJson,
    datasets: Vec<Dataset>,
}

impl DatasetJsonReader {
    /// Read and parse a Dataset-JSON file.
    pub fn open(path: &Path, item_group_prefix: &str) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConvertError::io("read", path, e))?;
        let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok();

        let mut reader = Self::from_json_str(&text, item_group_prefix)?;
        reader.path = Some(path.to_path_buf());
        reader.modified = modified;

        info!(
            path = %path.display(),
            datasets = reader.datasets.len(),
            "loaded Dataset-JSON"
        );
        Ok(reader)
    }

    /// Parse a Dataset-JSON document held in memory.
    pub fn from_json_str(json: &str, item_group_prefix: &str) -> Result<Self> {
        let document: DatasetJson = serde_json::from_str(json)
            .map_err(|source| ConvertError::MalformedDocument { source })?;
        Self::from_document(document, item_group_prefix)
    }

    pub fn from_document(document: DatasetJson, item_group_prefix: &str) -> Result<Self> {
        let mut reader = Self {
            path: None,
            modified: None,
            item_group_prefix: item_group_prefix.to_string(),
            document,
            datasets: Vec::new(),
        };
        reader.datasets = reader.build_datasets()?;
        Ok(reader)
    }

    fn build_datasets(&self) -> Result<Vec<Dataset>> {
        let groups = &self.document.clinical_data.item_group_data;
        let mut datasets = Vec::with_capacity(groups.len());

        for (key, group) in groups {
            let items = &self.group(&group.name)?.items;
            let columns = items.iter().map(|item| {
                let mut column = Column::new(&item.oid, &item.name, &item.data_type);
                column.label.clone_from(&item.label);
                column.length = item.length;
                column
            });

            let dataset =
                Dataset::new(key.as_str(), group.name.as_str(), group.label.clone())
                    .with_columns(columns)?;
            debug!(
                dataset = %dataset.name,
                columns = dataset.column_count(),
                "built dataset from item group"
            );
            datasets.push(dataset);
        }

        Ok(datasets)
    }

    /// The item group stored under the prefixed key of `name`.
    fn group(&self, name: &str) -> Result<&ItemGroupData> {
        let key = join_prefixed(&self.item_group_prefix, name);
        self.document
            .clinical_data
            .item_group_data
            .get(&key)
            .ok_or_else(|| ConvertError::DatasetNotFound {
                name: name.to_string(),
                key,
            })
    }

    /// Raw `itemData` rows of a dataset.
    pub fn records(&self, name: &str) -> Result<&[Vec<Value>]> {
        Ok(&self.group(name)?.item_data)
    }

    /// The dataset called `name`, or `DatasetNotFound`.
    pub fn require_dataset(&self, name: &str) -> Result<&Dataset> {
        self.get_dataset(name)
            .ok_or_else(|| ConvertError::DatasetNotFound {
                name: name.to_string(),
                key: join_prefixed(&self.item_group_prefix, name),
            })
    }

    pub fn study_oid(&self) -> Option<&str> {
        self.document.clinical_data.study_oid.as_deref()
    }

    pub fn metadata_version_oid(&self) -> Option<&str> {
        self.document.clinical_data.metadata_version_oid.as_deref()
    }

    pub fn item_group_prefix(&self) -> &str {
        &self.item_group_prefix
    }

    /// Source file, when read from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Modification time of the source file, when read from disk.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn document(&self) -> &DatasetJson {
        &self.document
    }
}

impl DatasetCollection for DatasetJsonReader {
    fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }
}
