use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a Define-XML document.
///
/// All of them are fatal for the document being parsed.
#[derive(Debug, Error)]
pub enum DefineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("root element does not declare the {prefix} namespace")]
    MissingNamespace { prefix: &'static str },

    #[error("missing required element {element}")]
    MissingElement { element: &'static str },

    #[error("{element} is missing required attribute {attribute}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("item group {dataset} references unknown ItemDef {item_oid}")]
    UnresolvedItemOid { dataset: String, item_oid: String },

    #[error("ItemDef {item_oid} has a non-integer Length {value:?}")]
    InvalidLength { item_oid: String, value: String },

    #[error(transparent)]
    Model(#[from] dsjson_model::ModelError),
}

pub type Result<T> = std::result::Result<T, DefineError>;
