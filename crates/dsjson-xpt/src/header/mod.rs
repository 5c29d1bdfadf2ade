//! XPT header record parsing and building.
//!
//! This module handles the various header records in an XPT file:
//! - Library headers (file-level metadata)
//! - Member headers (dataset-level metadata)
//! - NAMESTR records (variable definitions)
//! - OBS header (marks start of observation data)

pub mod datetime;
pub mod library;
pub mod member;
pub mod namestr;

pub use datetime::{format_xpt_datetime, parse_xpt_datetime};
pub use library::{
    LIBRARY_HEADER_PREFIX, LibraryInfo, RECORD_LEN, build_library_header, build_real_header,
    build_second_header, parse_real_header, parse_second_header, validate_library_header,
};
pub use member::{
    DSCRPTR_HEADER_PREFIX, MEMBER_HEADER_PREFIX, NAMESTR_HEADER_PREFIX, OBS_HEADER_PREFIX,
    align_to_record, build_dscrptr_header, build_member_data, build_member_header,
    build_member_second, build_namestr_header, build_obs_header, is_member_header,
    namestr_block_size, parse_dataset_label, parse_dataset_name, parse_dataset_type,
    parse_namestr_len, parse_variable_count, validate_dscrptr_header, validate_member_header,
    validate_namestr_header, validate_obs_header,
};
pub use namestr::{
    NAMESTR_LEN, NAMESTR_LEN_VAX, build_namestr, parse_namestr, parse_namestr_records,
};

/// Truncate a string to at most `max` bytes on a character boundary.
#[must_use]
pub fn truncate_str(value: &str, max: usize) -> String {
    if value.len() <= max {
        return value.to_string();
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

/// Read a string from a byte slice, trimming trailing spaces.
pub(crate) fn read_string(data: &[u8], offset: usize, len: usize) -> String {
    data.get(offset..offset + len)
        .map(|slice| String::from_utf8_lossy(slice).trim_end().to_string())
        .unwrap_or_default()
}

/// Write a string into a space-padded field, truncating on a character boundary.
pub(crate) fn write_string(buf: &mut [u8], offset: usize, value: &str, len: usize) {
    let field = &mut buf[offset..offset + len];
    field.fill(b' ');
    let value = truncate_str(value, len);
    field[..value.len()].copy_from_slice(value.as_bytes());
}

/// Build a fixed `HEADER RECORD*******...` record with the given prefix.
pub(crate) fn build_fixed_header(prefix: &str) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];

    let prefix_bytes = prefix.as_bytes();
    let copy_len = prefix_bytes.len().min(48);
    record[..copy_len].copy_from_slice(&prefix_bytes[..copy_len]);

    // Offsets 48..78 are ASCII zeros; the last two bytes stay blank.
    record[48..78].fill(b'0');

    record
}
