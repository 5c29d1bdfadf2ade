//! Library header records.
//!
//! A transport file opens with three records: the fixed
//! `LIBRARY HEADER RECORD` marker, the "real" header carrying the SAS
//! version, host and creation time, and a second record holding the
//! modification time.

use crate::error::{Result, XptError};
use crate::types::XptWriterOptions;

use super::{build_fixed_header, read_string, write_string};

/// Record length in bytes.
pub const RECORD_LEN: usize = 80;

pub const LIBRARY_HEADER_PREFIX: &str = "HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!";

/// File-level header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    pub sas_version: String,
    pub os_name: String,
    /// `ddMMMyy:hh:mm:ss`
    pub created: String,
    pub modified: String,
}

impl Default for LibraryInfo {
    fn default() -> Self {
        Self {
            sas_version: "9.4".to_string(),
            os_name: "RUST".to_string(),
            created: "01JAN70:00:00:00".to_string(),
            modified: "01JAN70:00:00:00".to_string(),
        }
    }
}

impl From<&XptWriterOptions> for LibraryInfo {
    fn from(opts: &XptWriterOptions) -> Self {
        Self {
            sas_version: opts.sas_version.clone(),
            os_name: opts.os_name.clone(),
            created: opts.format_created(),
            modified: opts.format_modified(),
        }
    }
}

pub fn validate_library_header(record: &[u8]) -> Result<()> {
    if record.len() < RECORD_LEN {
        return Err(XptError::invalid_format("file too short for a library header"));
    }
    if !record.starts_with(LIBRARY_HEADER_PREFIX.as_bytes()) {
        return Err(XptError::missing_header("LIBRARY HEADER"));
    }
    Ok(())
}

/// Parse the real header.
///
/// | Offset | Length | Field   |
/// |--------|--------|---------|
/// | 0      | 8      | "SAS"   |
/// | 8      | 8      | "SAS"   |
/// | 16     | 8      | "SASLIB"|
/// | 24     | 8      | version |
/// | 32     | 8      | host OS |
/// | 64     | 16     | created |
pub fn parse_real_header(record: &[u8]) -> Result<LibraryInfo> {
    if record.len() < RECORD_LEN {
        return Err(XptError::invalid_format("real header too short"));
    }

    Ok(LibraryInfo {
        sas_version: read_string(record, 24, 8),
        os_name: read_string(record, 32, 8),
        created: read_string(record, 64, 16),
        modified: String::new(),
    })
}

/// Modified datetime from the second header record.
pub fn parse_second_header(record: &[u8]) -> String {
    read_string(record, 0, 16)
}

#[must_use]
pub fn build_library_header() -> [u8; RECORD_LEN] {
    build_fixed_header(LIBRARY_HEADER_PREFIX)
}

#[must_use]
pub fn build_real_header(info: &LibraryInfo) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_string(&mut record, 0, "SAS", 8);
    write_string(&mut record, 8, "SAS", 8);
    write_string(&mut record, 16, "SASLIB", 8);
    write_string(&mut record, 24, &info.sas_version, 8);
    write_string(&mut record, 32, &info.os_name, 8);
    write_string(&mut record, 64, &info.created, 16);
    record
}

#[must_use]
pub fn build_second_header(modified: &str) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_string(&mut record, 0, modified, 16);
    record
}
