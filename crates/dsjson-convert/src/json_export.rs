//! Dataset-JSON output from SAS transport libraries.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use dsjson_model::{RECORD_ID_LABEL, RECORD_SEQUENCE, join_prefixed};
use dsjson_xpt::{XptColumn, XptDataset, XptType, XptValue, read_xpt_library};
use indexmap::IndexMap;
use serde_json::{Number, Value};
use tracing::{info, info_span};

use crate::error::{ConvertError, Result};
use crate::metadata::MetadataSource;
use crate::output::{output_path, write_atomic};
use crate::schema::{ClinicalData, DatasetJson, ItemDescriptor, ItemGroupData};

/// Type written for numeric variables when no Define type is available.
const DEFAULT_NUMERIC_TYPE: &str = "float";

/// Prefixes used when naming item groups and items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonExportOptions {
    /// Joined with the dataset name to form the `itemGroupData` key.
    pub item_group_prefix: String,
    /// Joined with the variable name to form each item `OID`.
    pub item_prefix: String,
}

impl Default for JsonExportOptions {
    fn default() -> Self {
        Self {
            item_group_prefix: String::new(),
            item_prefix: "IT".to_string(),
        }
    }
}

impl JsonExportOptions {
    #[must_use]
    pub fn with_item_group_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.item_group_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_item_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.item_prefix = prefix.into();
        self
    }
}

/// Convert every member of an XPT library into `<output_folder>/<name>.json`.
///
/// Returns the written paths in library order.
pub fn write_dataset_json(
    xpt_path: &Path,
    study_oid: &str,
    metadata_version_oid: &str,
    output_folder: &Path,
    options: &JsonExportOptions,
    metadata: MetadataSource<'_>,
) -> Result<Vec<PathBuf>> {
    let _span = info_span!("xpt_to_json", path = %xpt_path.display()).entered();
    let library = read_xpt_library(xpt_path)?;

    let mut outputs = Vec::with_capacity(library.len());
    for member in library.iter() {
        let document =
            build_dataset_json(member, study_oid, metadata_version_oid, options, metadata);
        let path = output_path(output_folder, &member.name, "json")?;
        write_atomic(&path, |file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &document)
                .map_err(|e| ConvertError::io("write", &path, e.into()))?;
            writer
                .flush()
                .map_err(|e| ConvertError::io("write", &path, e))
        })?;
        info!(
            dataset = %member.name,
            rows = member.num_rows(),
            path = %path.display(),
            "wrote Dataset-JSON"
        );
        outputs.push(path);
    }
    Ok(outputs)
}

/// Build the Dataset-JSON document for one transport member.
pub fn build_dataset_json(
    member: &XptDataset,
    study_oid: &str,
    metadata_version_oid: &str,
    options: &JsonExportOptions,
    metadata: MetadataSource<'_>,
) -> DatasetJson {
    let name = member.name.to_uppercase();
    let label = member
        .label
        .as_deref()
        .filter(|label| !label.is_empty())
        .map_or_else(|| name.clone(), str::to_string);

    let (items, item_data) = if member.columns.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let items = std::iter::once(sequence_item())
            .chain(
                member
                    .columns
                    .iter()
                    .map(|column| build_item(&name, column, options, metadata)),
            )
            .collect();
        (items, build_item_data(member))
    };

    let group = ItemGroupData {
        records: Some(member.num_rows() as u64),
        name: name.clone(),
        label: Some(label),
        items,
        item_data,
    };

    let mut item_group_data = IndexMap::new();
    item_group_data.insert(join_prefixed(&options.item_group_prefix, &name), group);

    DatasetJson {
        clinical_data: ClinicalData {
            study_oid: Some(study_oid.to_string()),
            metadata_version_oid: Some(metadata_version_oid.to_string()),
            item_group_data,
        },
    }
}

fn sequence_item() -> ItemDescriptor {
    ItemDescriptor {
        oid: RECORD_SEQUENCE.to_string(),
        name: RECORD_SEQUENCE.to_string(),
        label: Some(RECORD_ID_LABEL.to_string()),
        data_type: "integer".to_string(),
        length: None,
    }
}

fn build_item(
    dataset: &str,
    column: &XptColumn,
    options: &JsonExportOptions,
    metadata: MetadataSource<'_>,
) -> ItemDescriptor {
    let name = column.name.to_uppercase();
    let define_column = metadata.define_column(dataset, &name);

    let label = column
        .label
        .as_deref()
        .filter(|label| !label.is_empty())
        .map_or_else(|| name.clone(), str::to_string);
    let length = define_column
        .and_then(|c| c.length)
        .unwrap_or_else(|| u32::from(column.length));
    let data_type = match column.data_type {
        XptType::Char => "string".to_string(),
        XptType::Num => define_column
            .map_or(DEFAULT_NUMERIC_TYPE, |c| c.data_type.as_str())
            .to_string(),
    };

    ItemDescriptor {
        oid: join_prefixed(&options.item_prefix, &name),
        name,
        label: Some(label),
        data_type,
        length: Some(length),
    }
}

fn build_item_data(member: &XptDataset) -> Vec<Vec<Value>> {
    member
        .rows
        .iter()
        .zip(1u64..)
        .map(|(row, seq)| {
            std::iter::once(Value::from(seq))
                .chain(row.iter().map(xpt_value_to_json))
                .collect()
        })
        .collect()
}

/// SAS missing values and NaN become `null`.
fn xpt_value_to_json(value: &XptValue) -> Value {
    match value {
        XptValue::Char(s) => Value::String(s.clone()),
        XptValue::Num(n) => n
            .value()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
    }
}
