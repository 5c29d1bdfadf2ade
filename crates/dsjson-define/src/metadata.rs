//! Parsed Define-XML metadata.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use dsjson_model::{Dataset, DatasetCollection};
use tracing::{debug, info};

use crate::error::{DefineError, Result};
use crate::namespaces::DefineNamespaces;
use crate::parser::{RawDefine, parse_define};

/// Study-level metadata: one [`Dataset`] per `ItemGroupDef`, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineMetadata {
    study_oid: String,
    metadata_version_oid: String,
    namespaces: DefineNamespaces,
    datasets: Vec<Dataset>,
}

impl DefineMetadata {
    /// Read and parse a Define-XML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path).map_err(|source| DefineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let metadata = Self::parse(&xml)?;
        info!(
            path = %path.display(),
            study_oid = %metadata.study_oid,
            datasets = metadata.datasets.len(),
            "loaded Define-XML"
        );
        Ok(metadata)
    }

    /// Parse a Define-XML document held in memory.
    pub fn parse(xml: &str) -> Result<Self> {
        let raw = parse_define(xml)?;
        Self::resolve(raw)
    }

    fn resolve(raw: RawDefine) -> Result<Self> {
        let RawDefine {
            namespaces,
            study_oid,
            metadata_version_oid,
            groups,
            items,
        } = raw;

        let mut datasets = Vec::with_capacity(groups.len());
        for group in groups {
            let columns = group
                .item_refs
                .iter()
                .map(|item_oid| {
                    items
                        .get(item_oid)
                        .cloned()
                        .ok_or_else(|| DefineError::UnresolvedItemOid {
                            dataset: group.name.clone(),
                            item_oid: item_oid.clone(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            debug!(dataset = %group.name, columns = columns.len(), "resolved item group");
            datasets.push(Dataset::new(group.oid, group.name, group.label).with_columns(columns)?);
        }

        Ok(Self {
            study_oid,
            metadata_version_oid,
            namespaces,
            datasets,
        })
    }

    pub fn study_oid(&self) -> &str {
        &self.study_oid
    }

    pub fn metadata_version_oid(&self) -> &str {
        &self.metadata_version_oid
    }

    pub fn namespaces(&self) -> &DefineNamespaces {
        &self.namespaces
    }
}

impl FromStr for DefineMetadata {
    type Err = DefineError;

    fn from_str(xml: &str) -> Result<Self> {
        Self::parse(xml)
    }
}

impl DatasetCollection for DefineMetadata {
    fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }
}
