//! Where column metadata comes from when writing.

use dsjson_define::DefineMetadata;
use dsjson_model::{Column, DatasetCollection};

/// Column metadata used by the writers.
///
/// `Embedded` means only what the source file itself carries.
#[derive(Debug, Clone, Copy, Default)]
pub enum MetadataSource<'a> {
    Define(&'a DefineMetadata),
    #[default]
    Embedded,
}

impl<'a> MetadataSource<'a> {
    /// The Define column for `dataset`/`column`, if a Define is in use and
    /// has one.
    pub fn define_column(&self, dataset: &str, column: &str) -> Option<&'a Column> {
        match *self {
            Self::Define(define) => define.get_column(dataset, column),
            Self::Embedded => None,
        }
    }

    pub fn define(&self) -> Option<&'a DefineMetadata> {
        match *self {
            Self::Define(define) => Some(define),
            Self::Embedded => None,
        }
    }
}

impl<'a> From<Option<&'a DefineMetadata>> for MetadataSource<'a> {
    fn from(define: Option<&'a DefineMetadata>) -> Self {
        define.map_or(Self::Embedded, Self::Define)
    }
}

impl<'a> From<&'a DefineMetadata> for MetadataSource<'a> {
    fn from(define: &'a DefineMetadata) -> Self {
        Self::Define(define)
    }
}
