//! Write-then-read tests for transport libraries.

use std::io::Cursor;

use chrono::NaiveDate;
use dsjson_xpt::{
    MissingValue, XptColumn, XptDataset, XptError, XptLibrary, XptReader, XptValue, XptWriter,
    XptWriterOptions, read_xpt_library, write_xpt_library,
};

fn fixed_options() -> XptWriterOptions {
    let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    XptWriterOptions::default().with_timestamp(dt)
}

fn write_to_vec(datasets: &[XptDataset]) -> Vec<u8> {
    let mut buffer = Vec::new();
    XptWriter::with_options(Cursor::new(&mut buffer), fixed_options())
        .write_library(datasets)
        .unwrap();
    buffer
}

fn roundtrip_library(datasets: &[XptDataset]) -> XptLibrary {
    let buffer = write_to_vec(datasets);
    XptReader::new(Cursor::new(&buffer)).read_library().unwrap()
}

fn demographics() -> XptDataset {
    let mut dataset = XptDataset::with_columns(
        "DM",
        vec![
            XptColumn::character("USUBJID", 20).with_label("Unique Subject ID"),
            XptColumn::numeric("AGE")
                .with_label("Age in Years")
                .with_format("BEST", 8, 0),
        ],
    )
    .with_label("Demographics");
    dataset.add_row(vec![XptValue::character("001"), XptValue::numeric(25.0)]);
    dataset.add_row(vec![XptValue::character("002"), XptValue::numeric_missing()]);
    dataset
}

#[test]
fn test_single_member_roundtrip() {
    let library = roundtrip_library(&[demographics()]);

    assert_eq!(library.len(), 1);
    assert_eq!(library.info.created, "15MAR24:09:00:00");

    let dm = &library.datasets[0];
    assert_eq!(dm, &demographics());
}

#[test]
fn test_multi_member_library() {
    let mut ae = XptDataset::with_columns(
        "AE",
        vec![
            XptColumn::character("AETERM", 200).with_label("Reported Term"),
            XptColumn::numeric("AESEQ"),
        ],
    );
    for i in 1..=7 {
        ae.add_row(vec![
            XptValue::character(format!("TERM {i}")),
            XptValue::numeric(f64::from(i)),
        ]);
    }

    let library = roundtrip_library(&[demographics(), ae.clone()]);

    assert_eq!(library.len(), 2);
    assert_eq!(library.get("dm"), Some(&demographics()));
    assert_eq!(library.get("AE"), Some(&ae));
    let names: Vec<_> = library.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["DM", "AE"]);
}

#[test]
fn test_all_missing_codes_survive() {
    let codes: Vec<MissingValue> = std::iter::once(MissingValue::Standard)
        .chain(std::iter::once(MissingValue::Underscore))
        .chain(('A'..='Z').map(MissingValue::Special))
        .collect();

    let mut dataset = XptDataset::with_columns("MISS", vec![XptColumn::numeric("X")]);
    for code in &codes {
        dataset.add_row(vec![XptValue::numeric_missing_with(*code)]);
    }

    let library = roundtrip_library(&[dataset]);
    let read: Vec<_> = library.datasets[0]
        .rows
        .iter()
        .map(|row| match &row[0] {
            XptValue::Num(n) => n.missing_type(),
            XptValue::Char(_) => None,
        })
        .collect();
    assert_eq!(read, codes.into_iter().map(Some).collect::<Vec<_>>());
}

#[test]
fn test_empty_dataset() {
    let dataset = XptDataset::with_columns("EMPTY", vec![XptColumn::character("A", 1)]);
    let library = roundtrip_library(&[dataset.clone(), demographics()]);

    assert_eq!(library.datasets[0], dataset);
    assert_eq!(library.datasets[1].num_rows(), 2);
}

#[test]
fn test_output_is_deterministic() {
    let first = write_to_vec(&[demographics()]);
    let second = write_to_vec(&[demographics()]);
    assert_eq!(first, second);
    assert_eq!(first.len() % 80, 0);
}

#[test]
fn test_validation_happens_before_writing() {
    let mut bad = XptDataset::with_columns("BAD", vec![XptColumn::numeric("A")]);
    bad.add_row(vec![]);

    let mut buffer = Vec::new();
    let result = XptWriter::new(Cursor::new(&mut buffer)).write_library(&[demographics(), bad]);

    assert!(matches!(result, Err(XptError::RowLengthMismatch { .. })));
    assert!(buffer.is_empty());
}

#[test]
fn test_rejects_non_xpt_input() {
    let result = XptReader::new(Cursor::new(b"not a transport file".to_vec())).read_library();
    assert!(result.is_err());
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lib.xpt");

    write_xpt_library(&path, &[demographics()], &fixed_options()).unwrap();
    let library = read_xpt_library(&path).unwrap();
    assert_eq!(library.datasets, vec![demographics()]);

    let missing = read_xpt_library(&dir.path().join("absent.xpt"));
    assert!(matches!(missing, Err(XptError::FileNotFound { .. })));
}
