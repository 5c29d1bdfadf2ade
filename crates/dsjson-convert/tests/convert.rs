//! End-to-end conversions through temporary folders.

use std::fs;

use dsjson_convert::{
    ConvertError, DatasetJsonReader, JsonExportOptions, MetadataSource, write_csv,
    write_dataset_json, write_xpt,
};
use dsjson_define::DefineMetadata;
use dsjson_model::DatasetCollection;
use dsjson_xpt::{XptType, read_xpt};
use polars::prelude::DataType;

const DM_JSON: &str = r#"{
  "clinicalData": {
    "studyOID": "CDISC01",
    "metaDataVersionOID": "MDV.1",
    "itemGroupData": {
      "IG.DM": {
        "records": 2,
        "name": "DM",
        "label": "Demographics",
        "items": [
          {"OID": "ITEMGROUPDATASEQ", "name": "ITEMGROUPDATASEQ", "label": "Record identifier", "type": "integer"},
          {"OID": "IT.USUBJID", "name": "USUBJID", "label": "Unique Subject Identifier", "type": "string", "length": 20},
          {"OID": "IT.AGE", "name": "AGE", "label": "Age", "type": "integer"}
        ],
        "itemData": [
          [1, "001", 25],
          [2, "002", null]
        ]
      }
    }
  }
}"#;

const DEFINE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ODM xmlns="http://www.cdisc.org/ns/odm/v1.3" xmlns:def="http://www.cdisc.org/ns/def/v2.1">
  <Study OID="CDISC01">
    <MetaDataVersion OID="MDV.1" Name="Study CDISC01">
      <ItemGroupDef OID="IG.DM" Name="DM">
        <ItemRef ItemOID="IT.USUBJID"/>
        <ItemRef ItemOID="IT.AGE"/>
      </ItemGroupDef>
      <ItemDef OID="IT.USUBJID" Name="USUBJID" DataType="text" Length="20"/>
      <ItemDef OID="IT.AGE" Name="AGE" DataType="integer" Length="3" def:DisplayFormat="3."/>
    </MetaDataVersion>
  </Study>
</ODM>
"#;

fn reader() -> DatasetJsonReader {
    DatasetJsonReader::from_json_str(DM_JSON, "IG").unwrap()
}

#[test]
fn reads_prefixed_item_groups() {
    let reader = reader();
    assert_eq!(reader.dataset_names(), vec!["DM"]);
    assert_eq!(reader.study_oid(), Some("CDISC01"));

    let dm = reader.get_dataset("DM").unwrap();
    assert_eq!(dm.oid, "IG.DM");
    assert_eq!(dm.column_names(), vec!["ITEMGROUPDATASEQ", "USUBJID", "AGE"]);
    assert_eq!(dm.get_column("USUBJID").unwrap().length, Some(20));
}

#[test]
fn wrong_prefix_is_dataset_not_found() {
    let err = DatasetJsonReader::from_json_str(DM_JSON, "").unwrap_err();
    assert!(matches!(err, ConvertError::DatasetNotFound { ref key, .. } if key == "DM"));
}

#[test]
fn missing_clinical_data_is_malformed() {
    let err = DatasetJsonReader::from_json_str(r#"{"itemGroupData": {}}"#, "").unwrap_err();
    assert!(matches!(err, ConvertError::MalformedDocument { .. }));
}

#[test]
fn frame_follows_json_values() {
    let frame = reader().to_frame("DM").unwrap();
    assert_eq!(frame.num_rows(), 2);
    assert_eq!(frame.data.dtypes(), vec![DataType::String, DataType::Int64]);
    assert_eq!(frame.data.column("AGE").unwrap().null_count(), 1);
}

#[test]
fn csv_has_sequence_first_and_empty_nulls() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), &reader(), "DM").unwrap();
    assert_eq!(path, dir.path().join("dm.csv"));

    let csv = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(csv.trim_end(), @r"
    ITEMGROUPDATASEQ,USUBJID,AGE
    1,001,25
    2,002,
    ");
}

#[test]
fn xpt_uses_embedded_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_xpt(dir.path(), &reader(), "DM", MetadataSource::Embedded).unwrap();
    assert_eq!(path, dir.path().join("dm.xpt"));

    let xpt = read_xpt(&path).unwrap();
    assert_eq!(xpt.name, "DM");
    assert_eq!(xpt.label.as_deref(), Some("Demographics"));
    assert_eq!(xpt.num_rows(), 2);

    let usubjid = &xpt.columns[0];
    assert_eq!(usubjid.data_type, XptType::Char);
    assert_eq!(usubjid.length, 20);
    assert_eq!(usubjid.label.as_deref(), Some("Unique Subject Identifier"));

    let age = &xpt.columns[1];
    assert_eq!(age.data_type, XptType::Num);
    assert_eq!(age.format_length, 0);
    assert_eq!(xpt.rows[0][1].as_f64(), Some(25.0));
    assert!(xpt.rows[1][1].is_missing());
}

#[test]
fn xpt_takes_display_format_from_define() {
    let define = DefineMetadata::parse(DEFINE).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = write_xpt(dir.path(), &reader(), "DM", Some(&define).into()).unwrap();

    let xpt = read_xpt(&path).unwrap();
    let age = &xpt.columns[1];
    assert_eq!(age.format, None);
    assert_eq!(age.format_length, 3);
    assert_eq!(age.format_decimals, 0);
}

#[test]
fn xpt_output_is_repeatable() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let a = write_xpt(first.path(), &reader(), "DM", MetadataSource::Embedded).unwrap();
    let b = write_xpt(second.path(), &reader(), "DM", MetadataSource::Embedded).unwrap();
    assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
}

#[test]
fn missing_destination_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("out");
    let err = write_csv(&missing, &reader(), "DM").unwrap_err();
    assert!(matches!(err, ConvertError::DestinationNotFound { .. }));
    assert!(!missing.exists());
}

#[test]
fn json_to_xpt_to_json_keeps_values() {
    let xpt_dir = tempfile::tempdir().unwrap();
    let json_dir = tempfile::tempdir().unwrap();
    let xpt_path = write_xpt(xpt_dir.path(), &reader(), "DM", MetadataSource::Embedded).unwrap();

    let outputs = write_dataset_json(
        &xpt_path,
        "CDISC01",
        "MDV.1",
        json_dir.path(),
        &JsonExportOptions::default(),
        MetadataSource::Embedded,
    )
    .unwrap();
    assert_eq!(outputs, vec![json_dir.path().join("dm.json")]);

    let back = DatasetJsonReader::open(&outputs[0], "").unwrap();
    assert_eq!(back.metadata_version_oid(), Some("MDV.1"));
    let dm = back.get_dataset("DM").unwrap();
    assert_eq!(dm.label.as_deref(), Some("Demographics"));
    assert_eq!(dm.get_column("AGE").unwrap().data_type, "float");
    assert_eq!(dm.get_column("AGE").unwrap().oid, "IT.AGE");
    assert_eq!(dm.get_column("USUBJID").unwrap().data_type, "string");
    assert_eq!(dm.get_column("USUBJID").unwrap().length, Some(20));

    let frame = back.to_frame("DM").unwrap();
    let ages: Vec<Option<f64>> = frame.data.column("AGE").unwrap().f64().unwrap().into_iter().collect();
    assert_eq!(ages, vec![Some(25.0), None]);
    let ids: Vec<Option<&str>> =
        frame.data.column("USUBJID").unwrap().str().unwrap().into_iter().collect();
    assert_eq!(ids, vec![Some("001"), Some("002")]);
}

#[test]
fn json_export_prefers_define_types_and_lengths() {
    let define = DefineMetadata::parse(DEFINE).unwrap();
    let xpt_dir = tempfile::tempdir().unwrap();
    let json_dir = tempfile::tempdir().unwrap();
    let xpt_path = write_xpt(xpt_dir.path(), &reader(), "DM", MetadataSource::Embedded).unwrap();

    let outputs = write_dataset_json(
        &xpt_path,
        define.study_oid(),
        define.metadata_version_oid(),
        json_dir.path(),
        &JsonExportOptions::default().with_item_group_prefix("IG"),
        MetadataSource::Define(&define),
    )
    .unwrap();

    let back = DatasetJsonReader::open(&outputs[0], "IG").unwrap();
    let age = back.get_column("DM", "AGE").unwrap();
    assert_eq!(age.data_type, "integer");
    assert_eq!(age.length, Some(3));
    let usubjid = back.get_column("DM", "USUBJID").unwrap();
    assert_eq!(usubjid.data_type, "string");
    assert_eq!(usubjid.length, Some(20));
    assert!(back.modified().is_some());
}

#[test]
fn json_export_keeps_character_columns_as_string() {
    let define = DEFINE.replace(
        r#"Name="USUBJID" DataType="text" Length="20""#,
        r#"Name="USUBJID" DataType="integer" Length="5""#,
    );
    let define = DefineMetadata::parse(&define).unwrap();
    let xpt_dir = tempfile::tempdir().unwrap();
    let json_dir = tempfile::tempdir().unwrap();
    let xpt_path = write_xpt(xpt_dir.path(), &reader(), "DM", MetadataSource::Embedded).unwrap();

    let outputs = write_dataset_json(
        &xpt_path,
        define.study_oid(),
        define.metadata_version_oid(),
        json_dir.path(),
        &JsonExportOptions::default(),
        MetadataSource::Define(&define),
    )
    .unwrap();

    let back = DatasetJsonReader::open(&outputs[0], "").unwrap();
    let usubjid = back.get_column("DM", "USUBJID").unwrap();
    assert_eq!(usubjid.data_type, "string");
    assert_eq!(usubjid.length, Some(5));
    assert_eq!(back.get_column("DM", "AGE").unwrap().data_type, "integer");
}

fn single_column_json(values: &[serde_json::Value]) -> String {
    let rows: Vec<serde_json::Value> = values
        .iter()
        .zip(1..)
        .map(|(value, seq)| serde_json::json!([seq, value]))
        .collect();
    serde_json::json!({
        "clinicalData": {
            "itemGroupData": {
                "DM": {
                    "records": rows.len(),
                    "name": "DM",
                    "items": [
                        {"OID": "ITEMGROUPDATASEQ", "name": "ITEMGROUPDATASEQ", "type": "integer"},
                        {"OID": "IT.USUBJID", "name": "USUBJID", "type": "string"}
                    ],
                    "itemData": rows
                }
            }
        }
    })
    .to_string()
}

#[test]
fn xpt_rejects_values_over_200_bytes() {
    let long = "x".repeat(250);
    let json = single_column_json(&["001".into(), long.into()]);
    let reader = DatasetJsonReader::from_json_str(&json, "").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let err = write_xpt(dir.path(), &reader, "DM", MetadataSource::Embedded).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::InvalidValue { ref column, row: 1, .. } if column == "USUBJID"
    ));
    assert!(err.to_string().contains("250 bytes"));
    assert!(!dir.path().join("dm.xpt").exists());
}

#[test]
fn xpt_accepts_values_of_exactly_200_bytes() {
    let json = single_column_json(&["x".repeat(200).into()]);
    let reader = DatasetJsonReader::from_json_str(&json, "").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = write_xpt(dir.path(), &reader, "DM", MetadataSource::Embedded).unwrap();
    let xpt = read_xpt(&path).unwrap();
    assert_eq!(xpt.columns[0].length, 200);
    assert_eq!(xpt.rows[0][0].as_str(), Some("x".repeat(200).as_str()));
}

#[test]
fn trailing_blank_rows_read_back_as_padding() {
    let json = single_column_json(&["001".into(), "".into(), serde_json::Value::Null]);
    let reader = DatasetJsonReader::from_json_str(&json, "").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = write_xpt(dir.path(), &reader, "DM", MetadataSource::Embedded).unwrap();
    let xpt = read_xpt(&path).unwrap();
    assert_eq!(xpt.num_rows(), 1);
    assert_eq!(xpt.rows[0][0].as_str(), Some("001"));
}
