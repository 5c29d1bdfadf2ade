//! Namespace configuration read from the document root.

use quick_xml::events::BytesStart;

use crate::error::{DefineError, Result};

/// The two namespaces element and attribute matching is done against.
///
/// Both must be declared on the root element: the default namespace (ODM)
/// through `xmlns` and the Define extension through `xmlns:def`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineNamespaces {
    pub default: String,
    pub def: String,
}

impl DefineNamespaces {
    pub(crate) fn from_root(root: &BytesStart<'_>) -> Result<Self> {
        let mut default = None;
        let mut def = None;

        for attr in root.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            match attr.key.as_ref() {
                b"xmlns" => default = Some(attr.unescape_value()?.into_owned()),
                b"xmlns:def" => def = Some(attr.unescape_value()?.into_owned()),
                _ => {}
            }
        }

        Ok(Self {
            default: default.ok_or(DefineError::MissingNamespace { prefix: "xmlns" })?,
            def: def.ok_or(DefineError::MissingNamespace {
                prefix: "xmlns:def",
            })?,
        })
    }
}
