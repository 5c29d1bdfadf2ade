//! Shared data model for Dataset-JSON, Define-XML and SAS transport conversions.
//!
//! Every document reader in the workspace (the Define-XML parser and the
//! Dataset-JSON reader) builds its own collection of [`Dataset`]s made of
//! [`Column`]s. The collections are read-only once the document is parsed and
//! are queried through the [`DatasetCollection`] trait.

pub mod column;
pub mod dataset;
pub mod error;
pub mod lookup;
pub mod naming;

pub use column::{Column, ColumnType};
pub use dataset::Dataset;
pub use error::{ModelError, Result};
pub use lookup::DatasetCollection;
pub use naming::{RECORD_ID_LABEL, RECORD_SEQUENCE, join_prefixed};
