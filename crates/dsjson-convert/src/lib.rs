//! Conversions between Dataset-JSON, SAS transport (XPT) and CSV.
//!
//! [`DatasetJsonReader`] loads a Dataset-JSON document and exposes its item
//! groups as [`Dataset`](dsjson_model::Dataset)s and polars frames. The
//! writers turn a dataset into an XPT or CSV file, or an XPT library back
//! into Dataset-JSON documents, optionally guided by Define-XML metadata.

pub mod csv_export;
pub mod error;
pub mod json_export;
pub mod metadata;
pub mod output;
pub mod polars_utils;
pub mod projection;
pub mod reader;
pub mod schema;
pub mod xpt_export;

pub use csv_export::write_csv;
pub use error::{ConvertError, Result};
pub use json_export::{JsonExportOptions, build_dataset_json, write_dataset_json};
pub use metadata::MetadataSource;
pub use projection::{DatasetFrame, project};
pub use reader::DatasetJsonReader;
pub use schema::{ClinicalData, DatasetJson, ItemDescriptor, ItemGroupData};
pub use xpt_export::{build_xpt_dataset, write_xpt};
