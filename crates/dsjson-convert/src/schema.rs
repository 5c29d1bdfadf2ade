//! Serde schema of a Dataset-JSON document.
//!
//! Only the members the converters use are modelled; anything else in the
//! document is ignored on read.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetJson {
    #[serde(rename = "clinicalData")]
    pub clinical_data: ClinicalData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalData {
    #[serde(rename = "studyOID", default)]
    pub study_oid: Option<String>,
    #[serde(rename = "metaDataVersionOID", default)]
    pub metadata_version_oid: Option<String>,
    /// Item groups keyed by (possibly prefixed) OID, in document order.
    #[serde(rename = "itemGroupData")]
    pub item_group_data: IndexMap<String, ItemGroupData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroupData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub items: Vec<ItemDescriptor>,
    /// One array per record, values in `items` order.
    #[serde(rename = "itemData")]
    pub item_data: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    #[serde(rename = "OID")]
    pub oid: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_document() {
        let json = r#"{
            "creationDateTime": "2024-01-01T00:00:00",
            "clinicalData": {
                "studyOID": "S1",
                "itemGroupData": {
                    "IG.DM": {
                        "records": 1,
                        "name": "DM",
                        "items": [{"OID": "ITEMGROUPDATASEQ", "name": "ITEMGROUPDATASEQ", "type": "integer"}],
                        "itemData": [[1]]
                    }
                }
            }
        }"#;
        let doc: DatasetJson = serde_json::from_str(json).unwrap();
        assert_eq!(doc.clinical_data.study_oid.as_deref(), Some("S1"));
        assert_eq!(doc.clinical_data.metadata_version_oid, None);
        let dm = &doc.clinical_data.item_group_data["IG.DM"];
        assert_eq!(dm.label, None);
        assert_eq!(dm.items[0].length, None);
    }

    #[test]
    fn missing_item_group_data_is_rejected() {
        let json = r#"{"clinicalData": {"studyOID": "S1"}}"#;
        assert!(serde_json::from_str::<DatasetJson>(json).is_err());
    }

    #[test]
    fn item_without_length_omits_it() {
        let item = ItemDescriptor {
            oid: "ITEMGROUPDATASEQ".to_string(),
            name: "ITEMGROUPDATASEQ".to_string(),
            label: Some("Record identifier".to_string()),
            data_type: "integer".to_string(),
            length: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"OID":"ITEMGROUPDATASEQ","name":"ITEMGROUPDATASEQ","label":"Record identifier","type":"integer"}"#
        );
    }
}
