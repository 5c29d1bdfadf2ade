//! XPT file reader.
//!
//! Reads every member of a V5 transport library.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, XptError};
use crate::float::decode_numeric;
use crate::header::{
    RECORD_LEN, align_to_record, is_member_header, parse_dataset_label,
    parse_dataset_name, parse_dataset_type, parse_namestr_len, parse_namestr_records,
    parse_real_header, parse_second_header, parse_variable_count, validate_dscrptr_header,
    validate_library_header, validate_member_header, validate_namestr_header,
    validate_obs_header,
};
use crate::types::{XptColumn, XptDataset, XptLibrary, XptReaderOptions, XptType, XptValue};

/// XPT file reader.
pub struct XptReader<R: Read> {
    reader: BufReader<R>,
    options: XptReaderOptions,
}

impl<R: Read> XptReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, XptReaderOptions::default())
    }

    pub fn with_options(reader: R, options: XptReaderOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Read every member in file order.
    pub fn read_library(mut self) -> Result<XptLibrary> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        parse_library(&data, &self.options)
    }

    /// Read the first member.
    pub fn read_dataset(self) -> Result<XptDataset> {
        self.read_library()?
            .into_iter()
            .next()
            .ok_or_else(|| XptError::invalid_format("library contains no members"))
    }
}

impl XptReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, XptReaderOptions::default())
    }

    pub fn open_with_options(path: &Path, options: XptReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                XptError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                XptError::Io(e)
            }
        })?;
        Ok(Self::with_options(file, options))
    }
}

/// Read the first dataset of an XPT file.
pub fn read_xpt(path: &Path) -> Result<XptDataset> {
    XptReader::open(path)?.read_dataset()
}

pub fn read_xpt_with_options(path: &Path, options: XptReaderOptions) -> Result<XptDataset> {
    XptReader::open_with_options(path, options)?.read_dataset()
}

/// Read every dataset of an XPT file.
pub fn read_xpt_library(path: &Path) -> Result<XptLibrary> {
    XptReader::open(path)?.read_library()
}

fn parse_library(data: &[u8], options: &XptReaderOptions) -> Result<XptLibrary> {
    validate_library_header(data)?;
    if !data.len().is_multiple_of(RECORD_LEN) {
        return Err(XptError::invalid_format(
            "file length is not a multiple of 80",
        ));
    }

    let mut info = parse_real_header(read_record(data, RECORD_LEN)?)?;
    info.modified = parse_second_header(read_record(data, RECORD_LEN * 2)?);

    let mut offset = RECORD_LEN * 3;
    let mut datasets = Vec::new();
    while offset < data.len() {
        let (dataset, next) = parse_member(data, offset, options)?;
        datasets.push(dataset);
        offset = next;
    }

    if datasets.is_empty() {
        return Err(XptError::missing_header("MEMBER HEADER"));
    }

    Ok(XptLibrary { info, datasets })
}

/// Parse the member starting at `offset`; returns it with the offset of the next member.
fn parse_member(
    data: &[u8],
    mut offset: usize,
    options: &XptReaderOptions,
) -> Result<(XptDataset, usize)> {
    let member_header = read_record(data, offset)?;
    validate_member_header(member_header)?;
    let namestr_len = parse_namestr_len(member_header)?;
    if namestr_len == 0 {
        return Err(XptError::invalid_format("NAMESTR length is zero"));
    }
    offset += RECORD_LEN;

    validate_dscrptr_header(read_record(data, offset)?)?;
    offset += RECORD_LEN;

    let name = parse_dataset_name(read_record(data, offset)?)?;
    offset += RECORD_LEN;

    let member_second = read_record(data, offset)?;
    let label = parse_dataset_label(member_second);
    let dataset_type = parse_dataset_type(member_second);
    offset += RECORD_LEN;

    let namestr_header = read_record(data, offset)?;
    validate_namestr_header(namestr_header)?;
    let var_count = parse_variable_count(namestr_header)?;
    offset += RECORD_LEN;

    let namestr_total = var_count
        .checked_mul(namestr_len)
        .ok_or(XptError::ObservationOverflow)?;
    let namestr_data = read_block(data, offset, namestr_total)?;
    let columns = parse_namestr_records(namestr_data, var_count, namestr_len)?;
    offset = align_to_record(offset + namestr_total);

    validate_obs_header(read_record(data, offset)?)?;
    offset += RECORD_LEN;

    let end = next_member_offset(data, offset);
    let obs_len = observation_length(&columns)?;
    let rows = parse_observations(&data[offset..end], obs_len, &columns, options)?;

    let dataset = XptDataset {
        name,
        label,
        dataset_type,
        columns,
        rows,
    };
    Ok((dataset, end))
}

/// Offset of the next member header at or after `offset`, or the end of data.
fn next_member_offset(data: &[u8], offset: usize) -> usize {
    let mut pos = offset;
    while pos + RECORD_LEN <= data.len() {
        if is_member_header(&data[pos..pos + RECORD_LEN]) {
            return pos;
        }
        pos += RECORD_LEN;
    }
    data.len()
}

fn read_record(data: &[u8], offset: usize) -> Result<&[u8]> {
    read_block(data, offset, RECORD_LEN)
}

fn read_block(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    data.get(offset..offset + len)
        .ok_or(XptError::RecordOutOfBounds { offset })
}

fn observation_length(columns: &[XptColumn]) -> Result<usize> {
    columns.iter().try_fold(0usize, |total, column| {
        total
            .checked_add(column.length as usize)
            .ok_or(XptError::ObservationOverflow)
    })
}

/// Split a member's observation region into rows.
///
/// The region is space-padded to a record boundary, so trailing all-space
/// rows that start inside the final record are padding.
fn parse_observations(
    region: &[u8],
    obs_len: usize,
    columns: &[XptColumn],
    options: &XptReaderOptions,
) -> Result<Vec<Vec<XptValue>>> {
    if obs_len == 0 {
        return Ok(Vec::new());
    }

    let mut rows_total = region.len() / obs_len;
    let remainder = &region[rows_total * obs_len..];
    if remainder.iter().any(|&b| b != b' ') {
        return Err(XptError::TrailingBytes);
    }

    let padding_start = region.len().saturating_sub(RECORD_LEN - 1);
    while rows_total > 0 {
        let start = (rows_total - 1) * obs_len;
        let is_blank = region[start..start + obs_len].iter().all(|&b| b == b' ');
        if start >= padding_start && is_blank {
            rows_total -= 1;
        } else {
            break;
        }
    }

    Ok(region
        .chunks_exact(obs_len)
        .take(rows_total)
        .map(|row| parse_row(row, columns, options))
        .collect())
}

fn parse_row(row_bytes: &[u8], columns: &[XptColumn], options: &XptReaderOptions) -> Vec<XptValue> {
    let mut values = Vec::with_capacity(columns.len());
    let mut pos = 0usize;

    for column in columns {
        let len = column.length as usize;
        let slice = &row_bytes[pos..pos + len];
        values.push(match column.data_type {
            XptType::Char => XptValue::Char(decode_char(slice, options.trim_strings)),
            XptType::Num => XptValue::Num(decode_numeric(slice)),
        });
        pos += len;
    }

    values
}

fn decode_char(bytes: &[u8], trim: bool) -> String {
    let text = String::from_utf8_lossy(bytes);
    if trim {
        text.trim_end().to_string()
    } else {
        text.into_owned()
    }
}
