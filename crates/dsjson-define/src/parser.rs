//! Single-pass event reader over a Define-XML document.
//!
//! The pass collects item groups (with their `ItemRef` OIDs in document
//! order) and every `ItemDef` keyed by OID. References are resolved
//! afterwards, so an `ItemDef` may appear before or after the groups that
//! use it.

use std::collections::HashMap;

use dsjson_model::Column;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{DefineError, Result};
use crate::namespaces::DefineNamespaces;

/// Elements of the default namespace the parser cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Study,
    MetaDataVersion,
    ItemGroupDef,
    ItemRef,
    ItemDef,
    Description,
    TranslatedText,
    Other,
}

impl Tag {
    fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"Study" => Self::Study,
            b"MetaDataVersion" => Self::MetaDataVersion,
            b"ItemGroupDef" => Self::ItemGroupDef,
            b"ItemRef" => Self::ItemRef,
            b"ItemDef" => Self::ItemDef,
            b"Description" => Self::Description,
            b"TranslatedText" => Self::TranslatedText,
            _ => Self::Other,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RawGroup {
    pub oid: String,
    pub name: String,
    pub label: Option<String>,
    pub item_refs: Vec<String>,
}

/// Everything collected from one pass, before reference resolution.
#[derive(Debug)]
pub(crate) struct RawDefine {
    pub namespaces: DefineNamespaces,
    pub study_oid: String,
    pub metadata_version_oid: String,
    pub groups: Vec<RawGroup>,
    pub items: HashMap<String, Column>,
}

/// Attributes of one element, split by namespace.
struct Attributes {
    plain: HashMap<String, String>,
    def: HashMap<String, String>,
}

impl Attributes {
    fn read(
        reader: &NsReader<&[u8]>,
        start: &BytesStart<'_>,
        namespaces: &DefineNamespaces,
    ) -> Result<Self> {
        let mut plain = HashMap::new();
        let mut def = HashMap::new();

        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let value = attr.unescape_value()?.into_owned();
            let (ns, local) = reader.resolve_attribute(attr.key);
            let local = String::from_utf8_lossy(local.as_ref()).into_owned();
            match ns {
                ResolveResult::Unbound => {
                    plain.insert(local, value);
                }
                ResolveResult::Bound(Namespace(uri)) if uri == namespaces.def.as_bytes() => {
                    def.insert(local, value);
                }
                _ => {}
            }
        }

        Ok(Self { plain, def })
    }

    fn required(&mut self, element: &'static str, attribute: &'static str) -> Result<String> {
        self.plain
            .remove(attribute)
            .ok_or(DefineError::MissingAttribute { element, attribute })
    }

    fn optional(&mut self, attribute: &str) -> Option<String> {
        self.plain.remove(attribute)
    }

    fn def(&mut self, attribute: &str) -> Option<String> {
        self.def.remove(attribute)
    }
}

/// Item under construction; becomes a [`Column`] at its end tag.
struct PendingItem {
    oid: String,
    name: String,
    data_type: String,
    length: Option<u32>,
    format: Option<String>,
    label: Option<String>,
}

impl PendingItem {
    fn into_column(self) -> Column {
        let mut column = Column::new(self.oid, self.name, self.data_type);
        column.label = self.label;
        column.length = self.length;
        column.format = self.format;
        column
    }
}

#[derive(Default)]
struct State {
    namespaces: Option<DefineNamespaces>,
    stack: Vec<Tag>,
    study_oid: Option<String>,
    metadata_version_oid: Option<String>,
    groups: Vec<RawGroup>,
    items: HashMap<String, Column>,
    group: Option<RawGroup>,
    item: Option<PendingItem>,
    /// Text of the `TranslatedText` being read, when it labels a group or item.
    text: Option<String>,
}

impl State {
    fn parent(&self) -> Option<Tag> {
        self.stack.last().copied()
    }

    fn grandparent(&self) -> Option<Tag> {
        self.stack.len().checked_sub(2).map(|i| self.stack[i])
    }

    fn open(&mut self, tag: Tag, mut attrs: Attributes) -> Result<()> {
        match (tag, self.parent()) {
            (Tag::Study, _) if self.stack.len() == 1 => {
                let oid = attrs.required("Study", "OID")?;
                self.study_oid.get_or_insert(oid);
            }
            (Tag::MetaDataVersion, Some(Tag::Study)) => {
                let oid = attrs.required("MetaDataVersion", "OID")?;
                self.metadata_version_oid.get_or_insert(oid);
            }
            (Tag::ItemGroupDef, Some(Tag::MetaDataVersion)) => {
                self.group = Some(RawGroup {
                    oid: attrs.required("ItemGroupDef", "OID")?,
                    name: attrs.required("ItemGroupDef", "Name")?,
                    label: None,
                    item_refs: Vec::new(),
                });
            }
            (Tag::ItemRef, Some(Tag::ItemGroupDef)) => {
                let item_oid = attrs.required("ItemRef", "ItemOID")?;
                if let Some(group) = self.group.as_mut() {
                    group.item_refs.push(item_oid);
                }
            }
            (Tag::ItemDef, Some(Tag::MetaDataVersion)) => {
                let oid = attrs.required("ItemDef", "OID")?;
                let length = match attrs.optional("Length") {
                    Some(value) => Some(value.trim().parse::<u32>().map_err(|_| {
                        DefineError::InvalidLength {
                            item_oid: oid.clone(),
                            value,
                        }
                    })?),
                    None => None,
                };
                self.item = Some(PendingItem {
                    name: attrs.required("ItemDef", "Name")?,
                    data_type: attrs.required("ItemDef", "DataType")?,
                    length,
                    format: attrs.def("DisplayFormat"),
                    label: None,
                    oid,
                });
            }
            (Tag::TranslatedText, Some(Tag::Description))
                if matches!(
                    self.grandparent(),
                    Some(Tag::ItemGroupDef | Tag::ItemDef)
                ) =>
            {
                self.text = Some(String::new());
            }
            _ => {}
        }
        self.stack.push(tag);
        Ok(())
    }

    fn close(&mut self) {
        let Some(tag) = self.stack.pop() else {
            return;
        };
        match tag {
            Tag::TranslatedText => {
                if let Some(text) = self.text.take() {
                    self.set_label(text);
                }
            }
            Tag::ItemGroupDef if self.parent() == Some(Tag::MetaDataVersion) => {
                if let Some(group) = self.group.take() {
                    self.groups.push(group);
                }
            }
            Tag::ItemDef if self.parent() == Some(Tag::MetaDataVersion) => {
                if let Some(item) = self.item.take() {
                    self.items.insert(item.oid.clone(), item.into_column());
                }
            }
            _ => {}
        }
    }

    /// Text is trimmed of surrounding whitespace. The first non-blank
    /// `TranslatedText` wins; blank text leaves the label unset.
    fn set_label(&mut self, text: String) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let slot = match self.grandparent() {
            Some(Tag::ItemGroupDef) => self.group.as_mut().map(|g| &mut g.label),
            Some(Tag::ItemDef) => self.item.as_mut().map(|i| &mut i.label),
            _ => None,
        };
        if let Some(slot) = slot {
            slot.get_or_insert_with(|| text.to_string());
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(buffer) = self.text.as_mut() {
            buffer.push_str(text);
        }
    }

    fn finish(self) -> Result<RawDefine> {
        let namespaces = self.namespaces.ok_or(DefineError::MissingElement { element: "ODM" })?;
        Ok(RawDefine {
            namespaces,
            study_oid: self
                .study_oid
                .ok_or(DefineError::MissingElement { element: "Study" })?,
            metadata_version_oid: self.metadata_version_oid.ok_or(DefineError::MissingElement {
                element: "MetaDataVersion",
            })?,
            groups: self.groups,
            items: self.items,
        })
    }
}

pub(crate) fn parse_define(xml: &str) -> Result<RawDefine> {
    let mut reader = NsReader::from_str(xml);
    let mut state = State::default();

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let in_default = |state: &State| match (&ns, &state.namespaces) {
            (ResolveResult::Bound(Namespace(uri)), Some(namespaces)) => {
                *uri == namespaces.default.as_bytes()
            }
            _ => false,
        };

        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                if state.namespaces.is_none() {
                    state.namespaces = Some(DefineNamespaces::from_root(start)?);
                }
                let tag = if in_default(&state) {
                    Tag::from_local_name(start.local_name().as_ref())
                } else {
                    Tag::Other
                };
                let is_empty = matches!(event, Event::Empty(_));

                let Some(namespaces) = state.namespaces.as_ref() else {
                    continue;
                };
                let attrs = Attributes::read(&reader, start, namespaces)?;
                state.open(tag, attrs)?;
                if is_empty {
                    state.close();
                }
            }
            Event::End(_) => state.close(),
            Event::Text(ref text) => {
                let text = text.decode().map_err(quick_xml::Error::from)?;
                state.push_text(&text);
            }
            Event::CData(ref cdata) => {
                let text = cdata.decode().map_err(quick_xml::Error::from)?;
                state.push_text(&text);
            }
            Event::GeneralRef(ref reference) => {
                if let Some(ch) = reference.resolve_char_ref()? {
                    state.push_text(ch.encode_utf8(&mut [0; 4]));
                } else {
                    let name = reference.decode().map_err(quick_xml::Error::from)?;
                    let resolved = resolve_predefined_entity(&name).unwrap_or_default();
                    state.push_text(resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}
