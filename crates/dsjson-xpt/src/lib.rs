//! SAS Transport (XPT) V5 reader and writer.
//!
//! - Multi-member libraries
//! - IEEE ↔ IBM mainframe floating-point conversion
//! - All 28 SAS missing value codes (`.`, `._`, `.A`-`.Z`)
//! - Variable formats and informats
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use dsjson_xpt::{XptColumn, XptDataset, XptValue, read_xpt, write_xpt};
//!
//! let mut ds = XptDataset::with_columns(
//!     "DM",
//!     vec![
//!         XptColumn::character("USUBJID", 20).with_label("Unique Subject ID"),
//!         XptColumn::numeric("AGE").with_label("Age in Years"),
//!     ],
//! );
//! ds.add_row(vec![XptValue::character("STUDY-001"), XptValue::numeric(35.0)]);
//! write_xpt(Path::new("dm.xpt"), &ds).unwrap();
//!
//! let back = read_xpt(Path::new("dm.xpt")).unwrap();
//! assert_eq!(back.num_rows(), 1);
//! ```

mod error;
pub mod float;
pub mod header;
mod reader;
mod types;
mod writer;

pub use error::{Result, XptError};

pub use header::LibraryInfo;
pub use types::{
    Justification, MissingValue, NumericValue, XptColumn, XptDataset, XptLibrary,
    XptReaderOptions, XptType, XptValue, XptWriterOptions,
};

pub use reader::{XptReader, read_xpt, read_xpt_library, read_xpt_with_options};

pub use writer::{
    MAX_CHAR_LENGTH, MAX_LABEL_LENGTH, XptWriter, write_xpt, write_xpt_library,
    write_xpt_with_options,
};
