//! Core types for XPT file handling.
//!
//! This module provides the fundamental data structures for representing
//! XPT libraries, datasets, columns, values, and file handling options.

mod column;
mod dataset;
mod missing;
mod options;
mod value;

pub use column::{Justification, XptColumn, XptType};
pub use dataset::{XptDataset, XptLibrary};
pub use missing::MissingValue;
pub use options::{XptReaderOptions, XptWriterOptions};
pub use value::{NumericValue, XptValue};
