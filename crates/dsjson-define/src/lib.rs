//! Define-XML metadata parser.
//!
//! Reads the study OID, the metadata version OID and every item group of a
//! Define-XML document into the shared [`dsjson_model`] types. Elements are
//! matched on their resolved namespace, using the `xmlns` and `xmlns:def`
//! declarations of the root element.
//!
//! ```no_run
//! use std::path::Path;
//! use dsjson_define::DefineMetadata;
//! use dsjson_model::DatasetCollection;
//!
//! let define = DefineMetadata::from_path(Path::new("define.xml")).unwrap();
//! if let Some(age) = define.get_column("DM", "AGE") {
//!     println!("{} {:?}", age.data_type, age.format);
//! }
//! ```

mod error;
mod metadata;
mod namespaces;
mod parser;

pub use error::{DefineError, Result};
pub use metadata::DefineMetadata;
pub use namespaces::DefineNamespaces;
