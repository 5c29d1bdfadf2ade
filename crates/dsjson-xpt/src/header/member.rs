//! Member header records.
//!
//! Each member of a library is introduced by:
//!
//! 1. `MEMBER  HEADER RECORD` (with the NAMESTR length at offset 74)
//! 2. `DSCRPTR HEADER RECORD`
//! 3. Member data: dataset name, version, host, created datetime
//! 4. Member second: modified datetime, label, type
//! 5. `NAMESTR HEADER RECORD` (with the variable count at offset 54)
//! 6. NAMESTR records, padded to a record boundary
//! 7. `OBS     HEADER RECORD`, followed by the observations

use crate::error::{Result, XptError};
use crate::types::{XptDataset, XptWriterOptions};

use super::library::RECORD_LEN;
use super::{build_fixed_header, read_string, write_string};

pub const MEMBER_HEADER_PREFIX: &str = "HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!";
pub const DSCRPTR_HEADER_PREFIX: &str = "HEADER RECORD*******DSCRPTR HEADER RECORD!!!!!!!";
pub const NAMESTR_HEADER_PREFIX: &str = "HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!";
pub const OBS_HEADER_PREFIX: &str = "HEADER RECORD*******OBS     HEADER RECORD!!!!!!!";

fn validate_prefix(record: &[u8], prefix: &str, expected: &'static str) -> Result<()> {
    if record.len() < RECORD_LEN {
        return Err(XptError::invalid_format(format!(
            "{} truncated",
            expected.to_lowercase()
        )));
    }
    if !record.starts_with(prefix.as_bytes()) {
        return Err(XptError::missing_header(expected));
    }
    Ok(())
}

pub fn validate_member_header(record: &[u8]) -> Result<()> {
    validate_prefix(record, MEMBER_HEADER_PREFIX, "MEMBER HEADER")
}

pub fn validate_dscrptr_header(record: &[u8]) -> Result<()> {
    validate_prefix(record, DSCRPTR_HEADER_PREFIX, "DSCRPTR HEADER")
}

pub fn validate_namestr_header(record: &[u8]) -> Result<()> {
    validate_prefix(record, NAMESTR_HEADER_PREFIX, "NAMESTR HEADER")
}

pub fn validate_obs_header(record: &[u8]) -> Result<()> {
    validate_prefix(record, OBS_HEADER_PREFIX, "OBS HEADER")
}

/// Whether the record starts a new member.
#[must_use]
pub fn is_member_header(record: &[u8]) -> bool {
    record.len() >= RECORD_LEN && record.starts_with(MEMBER_HEADER_PREFIX.as_bytes())
}

fn parse_digits(record: &[u8], offset: usize, field: &str) -> Result<usize> {
    if record.len() < offset + 4 {
        return Err(XptError::invalid_format(format!("{field} field truncated")));
    }
    read_string(record, offset, 4)
        .trim()
        .parse::<usize>()
        .map_err(|_| XptError::NumericParse {
            field: field.to_string(),
        })
}

/// NAMESTR length from the member header: 140, or 136 on VAX/VMS.
pub fn parse_namestr_len(record: &[u8]) -> Result<usize> {
    parse_digits(record, 74, "NAMESTR length")
}

/// Variable count from the NAMESTR header.
pub fn parse_variable_count(record: &[u8]) -> Result<usize> {
    parse_digits(record, 54, "variable count")
}

/// Dataset name from the member data record (offset 8, 8 bytes).
pub fn parse_dataset_name(record: &[u8]) -> Result<String> {
    if record.len() < 16 {
        return Err(XptError::invalid_format("member data too short"));
    }
    let name = read_string(record, 8, 8);
    if name.is_empty() {
        return Err(XptError::invalid_format("empty dataset name"));
    }
    Ok(name)
}

/// Dataset label from the member second record (offset 32, 40 bytes).
pub fn parse_dataset_label(record: &[u8]) -> Option<String> {
    let label = read_string(record, 32, 40);
    (!label.is_empty()).then_some(label)
}

/// Dataset type from the member second record (offset 72, 8 bytes).
pub fn parse_dataset_type(record: &[u8]) -> Option<String> {
    let dtype = read_string(record, 72, 8);
    (!dtype.is_empty()).then_some(dtype)
}

#[must_use]
pub fn build_member_header(namestr_len: usize) -> [u8; RECORD_LEN] {
    let mut record = build_fixed_header(MEMBER_HEADER_PREFIX);
    write_string(&mut record, 64, "0160", 4);
    write_string(&mut record, 74, &format!("{namestr_len:04}"), 4);
    record
}

#[must_use]
pub fn build_dscrptr_header() -> [u8; RECORD_LEN] {
    build_fixed_header(DSCRPTR_HEADER_PREFIX)
}

#[must_use]
pub fn build_member_data(dataset: &XptDataset, options: &XptWriterOptions) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_string(&mut record, 0, "SAS", 8);
    write_string(&mut record, 8, &dataset.name, 8);
    write_string(&mut record, 16, "SASDATA", 8);
    write_string(&mut record, 24, &options.sas_version, 8);
    write_string(&mut record, 32, &options.os_name, 8);
    write_string(&mut record, 64, &options.format_created(), 16);
    record
}

#[must_use]
pub fn build_member_second(dataset: &XptDataset, options: &XptWriterOptions) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_string(&mut record, 0, &options.format_modified(), 16);
    write_string(&mut record, 32, dataset.effective_label(), 40);
    write_string(
        &mut record,
        72,
        dataset.dataset_type.as_deref().unwrap_or(""),
        8,
    );
    record
}

#[must_use]
pub fn build_namestr_header(var_count: usize) -> [u8; RECORD_LEN] {
    let mut record = build_fixed_header(NAMESTR_HEADER_PREFIX);
    write_string(&mut record, 54, &format!("{var_count:04}"), 4);
    record
}

#[must_use]
pub fn build_obs_header() -> [u8; RECORD_LEN] {
    build_fixed_header(OBS_HEADER_PREFIX)
}

/// Size of the NAMESTR block including padding to the next record.
#[must_use]
pub fn namestr_block_size(var_count: usize, namestr_len: usize) -> usize {
    align_to_record(var_count * namestr_len)
}

/// Round up to the next multiple of [`RECORD_LEN`].
#[must_use]
pub fn align_to_record(size: usize) -> usize {
    size.div_ceil(RECORD_LEN) * RECORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::NAMESTR_LEN;

    #[test]
    fn test_validate_headers() {
        assert!(validate_member_header(&build_member_header(NAMESTR_LEN)).is_ok());
        assert!(validate_dscrptr_header(&build_dscrptr_header()).is_ok());
        assert!(validate_namestr_header(&build_namestr_header(5)).is_ok());
        assert!(validate_obs_header(&build_obs_header()).is_ok());

        let err = validate_member_header(&build_obs_header()).unwrap_err();
        assert!(matches!(err, XptError::MissingHeader { .. }));
    }

    #[test]
    fn test_member_header_fields() {
        let header = build_member_header(140);
        assert!(is_member_header(&header));
        assert_eq!(&header[64..68], b"0160");
        assert_eq!(parse_namestr_len(&header).unwrap(), 140);
        assert_eq!(parse_namestr_len(&build_member_header(136)).unwrap(), 136);
        assert!(!is_member_header(&build_obs_header()));
    }

    #[test]
    fn test_parse_variable_count() {
        assert_eq!(parse_variable_count(&build_namestr_header(25)).unwrap(), 25);
    }

    #[test]
    fn test_member_data_and_second() {
        let dataset = XptDataset::new("DM")
            .with_label("Demographics")
            .with_type("DATA");
        let options = XptWriterOptions::default();

        let data = build_member_data(&dataset, &options);
        assert_eq!(parse_dataset_name(&data).unwrap(), "DM");

        let second = build_member_second(&dataset, &options);
        assert_eq!(parse_dataset_label(&second).as_deref(), Some("Demographics"));
        assert_eq!(parse_dataset_type(&second).as_deref(), Some("DATA"));
    }

    #[test]
    fn test_blank_label_is_none() {
        let second = build_member_second(&XptDataset::new("AE"), &XptWriterOptions::default());
        assert_eq!(parse_dataset_label(&second), None);
    }

    #[test]
    fn test_align_to_record() {
        assert_eq!(align_to_record(0), 0);
        assert_eq!(align_to_record(80), 80);
        assert_eq!(align_to_record(81), 160);
        assert_eq!(align_to_record(140), 160);
        assert_eq!(namestr_block_size(2, 140), 320);
        assert_eq!(namestr_block_size(10, 140), 1440);
    }
}
