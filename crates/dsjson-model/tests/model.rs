//! Tests for the shared dataset model.

use dsjson_model::{Column, Dataset, DatasetCollection, join_prefixed};

struct Document {
    datasets: Vec<Dataset>,
}

impl DatasetCollection for Document {
    fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }
}

fn document() -> Document {
    let dm = Dataset::new("IG.DM", "DM", Some("Demographics".to_string()))
        .with_columns([
            Column::new("IT.USUBJID", "USUBJID", "string").with_label("Unique Subject Identifier"),
            Column::new("IT.AGE", "AGE", "integer").with_length(8),
        ])
        .expect("dm columns");
    let ae = Dataset::new("IG.AE", "AE", None)
        .with_columns([Column::new("IT.AETERM", "AETERM", "string")])
        .expect("ae columns");
    Document {
        datasets: vec![dm, ae],
    }
}

#[test]
fn lookup_by_name() {
    let doc = document();
    assert_eq!(doc.dataset_names(), vec!["DM", "AE"]);
    assert_eq!(doc.get_dataset("AE").map(|ds| ds.oid.as_str()), Some("IG.AE"));
    assert_eq!(
        doc.get_column("DM", "AGE").and_then(|c| c.length),
        Some(8)
    );
    assert_eq!(doc.column_names("DM"), Some(vec!["USUBJID", "AGE"]));
}

#[test]
fn lookup_miss_is_none() {
    let doc = document();
    assert!(doc.get_dataset("LB").is_none());
    assert!(doc.get_column("LB", "AGE").is_none());
    assert!(doc.get_column("DM", "RACE").is_none());
    assert!(doc.column_names("LB").is_none());
}

#[test]
fn prefix_join_law() {
    for name in ["DM", "USUBJID", "AE"] {
        assert_eq!(join_prefixed("", name), name);
        for prefix in ["IG", "IT", "STUDY.IG"] {
            assert_eq!(join_prefixed(prefix, name), format!("{prefix}.{name}"));
        }
    }
}

#[test]
fn column_serializes_type_field() {
    let column = Column::new("IT.AGE", "AGE", "integer");
    let json = serde_json::to_value(&column).expect("serialize column");
    assert_eq!(json["type"], "integer");
    assert_eq!(json["name"], "AGE");
}
