//! SAS transport (XPT) output.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, Utc};
use dsjson_model::{Column, Dataset};
use dsjson_xpt::header::{RECORD_LEN, align_to_record, truncate_str};
use dsjson_xpt::{
    MAX_CHAR_LENGTH, MAX_LABEL_LENGTH, XptColumn, XptDataset, XptType, XptValue, XptWriter,
    XptWriterOptions,
};
use polars::prelude::{AnyValue, Column as FrameColumn, DataFrame, DataType};
use tracing::{info, warn};

use crate::error::{ConvertError, Result};
use crate::metadata::MetadataSource;
use crate::output::{output_path, write_atomic};
use crate::polars_utils::{any_to_f64, any_to_string};
use crate::reader::DatasetJsonReader;

const MAX_FORMAT_NAME_LENGTH: usize = 8;

/// Write one dataset to `<dest>/<name>.xpt`.
pub fn write_xpt(
    dest: &Path,
    reader: &DatasetJsonReader,
    dataset_name: &str,
    metadata: MetadataSource<'_>,
) -> Result<PathBuf> {
    let dataset = reader.require_dataset(dataset_name)?;
    let frame = reader.to_frame(dataset_name)?;
    let xpt = build_xpt_dataset(dataset, &frame.data, metadata)?;

    let path = output_path(dest, &dataset.name, "xpt")?;
    let options = XptWriterOptions::default().with_timestamp(header_timestamp(reader.modified()));
    write_atomic(&path, |file| {
        XptWriter::with_options(file, options).write_dataset(&xpt)?;
        Ok(())
    })?;

    info!(
        dataset = %dataset.name,
        rows = xpt.num_rows(),
        path = %path.display(),
        "wrote XPT"
    );
    Ok(path)
}

/// Build the transport dataset for a projected frame.
pub fn build_xpt_dataset(
    dataset: &Dataset,
    df: &DataFrame,
    metadata: MetadataSource<'_>,
) -> Result<XptDataset> {
    let columns = build_xpt_columns(dataset, df, metadata)?;
    let rows = build_xpt_rows(&columns, df)?;

    let mut xpt = XptDataset::with_columns(dataset.name.as_str(), columns);
    xpt.rows = rows;
    if let Some(label) = &dataset.label {
        xpt.label = Some(truncate_str(label, MAX_LABEL_LENGTH));
    }

    let blank = trailing_blank_rows(&xpt);
    if blank > 0 {
        warn!(
            dataset = %dataset.name,
            rows = blank,
            "trailing rows are all blank and will read back as record padding"
        );
    }
    Ok(xpt)
}

fn build_xpt_columns(
    dataset: &Dataset,
    df: &DataFrame,
    metadata: MetadataSource<'_>,
) -> Result<Vec<XptColumn>> {
    let mut columns = Vec::with_capacity(df.width());
    for series in df.get_columns() {
        let name = series.name().as_str();
        let source = dataset.get_column(name);

        let mut column = match series.dtype() {
            DataType::Int64 | DataType::Float64 | DataType::Boolean => XptColumn::numeric(name),
            _ => XptColumn::character(name, character_width(&dataset.name, series, source)?),
        };
        if let Some(label) = source.and_then(|c| c.label.as_deref()) {
            column.label = Some(truncate_str(label, MAX_LABEL_LENGTH));
        }
        if let Some(format) = metadata
            .define_column(&dataset.name, name)
            .and_then(|c| c.format.as_deref())
        {
            apply_display_format(&mut column, format);
        }
        columns.push(column);
    }
    Ok(columns)
}

/// Longest value in bytes, at least the declared length and 1.
///
/// A value longer than 200 bytes cannot be stored and is an error.
fn character_width(dataset: &str, series: &FrameColumn, source: Option<&Column>) -> Result<u16> {
    let mut longest = 0usize;
    for row in 0..series.len() {
        let value = series.get(row)?;
        if matches!(value, AnyValue::Null) {
            continue;
        }
        let len = any_to_string(value).len();
        if len > usize::from(MAX_CHAR_LENGTH) {
            return Err(ConvertError::InvalidValue {
                dataset: dataset.to_string(),
                column: series.name().to_string(),
                row,
                reason: format!(
                    "value is {len} bytes, longer than the {MAX_CHAR_LENGTH}-byte transport limit"
                ),
            });
        }
        longest = longest.max(len);
    }
    let declared = source.and_then(|c| c.length).unwrap_or(0) as usize;
    let width = longest.max(declared).clamp(1, usize::from(MAX_CHAR_LENGTH));
    Ok(u16::try_from(width).unwrap_or(MAX_CHAR_LENGTH))
}

/// Number of trailing rows a reader will take for record padding.
///
/// Observations are padded with spaces to the next 80-byte record, so rows
/// that encode as all spaces and start inside the final record are
/// indistinguishable from that padding.
fn trailing_blank_rows(xpt: &XptDataset) -> usize {
    let obs_len = xpt.observation_length();
    if obs_len == 0 {
        return 0;
    }
    let region_len = align_to_record(xpt.num_rows() * obs_len);
    let padding_start = region_len.saturating_sub(RECORD_LEN - 1);

    xpt.rows
        .iter()
        .enumerate()
        .rev()
        .take_while(|(idx, row)| idx * obs_len >= padding_start && encodes_blank(row))
        .count()
}

fn encodes_blank(row: &[XptValue]) -> bool {
    row.iter().all(|value| match value {
        XptValue::Char(s) => s.bytes().all(|b| b == b' '),
        XptValue::Num(_) => false,
    })
}

fn build_xpt_rows(columns: &[XptColumn], df: &DataFrame) -> Result<Vec<Vec<XptValue>>> {
    let series = df.get_columns();
    let mut rows = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let mut row = Vec::with_capacity(columns.len());
        for (column, values) in columns.iter().zip(series) {
            let value = values.get(row_idx)?;
            let cell = match column.data_type {
                XptType::Num => {
                    any_to_f64(value).map_or_else(XptValue::numeric_missing, XptValue::numeric)
                }
                XptType::Char => XptValue::Char(any_to_string(value)),
            };
            row.push(cell);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Apply a display format such as `DATE9.`, `8.2` or `$CHAR20.`.
fn apply_display_format(column: &mut XptColumn, format: &str) {
    let Some((name, width, decimals)) = parse_display_format(format) else {
        warn!(column = %column.name, format, "ignoring unusable display format");
        return;
    };
    column.format = (!name.is_empty()).then_some(name);
    column.format_length = width;
    column.format_decimals = decimals;
}

/// Split `NAMEw.d` into its name, width and decimals.
fn parse_display_format(format: &str) -> Option<(String, u16, u16)> {
    let format = format.trim();
    let (left, right) = format.rsplit_once('.').unwrap_or((format, ""));
    let name = left.trim_end_matches(|c: char| c.is_ascii_digit());
    if name.len() > MAX_FORMAT_NAME_LENGTH {
        return None;
    }
    let width = parse_or_zero(&left[name.len()..])?;
    let decimals = parse_or_zero(right)?;
    Some((name.to_uppercase(), width, decimals))
}

fn parse_or_zero(digits: &str) -> Option<u16> {
    if digits.is_empty() {
        Some(0)
    } else {
        digits.parse().ok()
    }
}

/// Header datetime: the source's modification time, else the Unix epoch.
fn header_timestamp(modified: Option<SystemTime>) -> NaiveDateTime {
    modified
        .map_or(DateTime::<Utc>::UNIX_EPOCH, DateTime::<Utc>::from)
        .naive_utc()
}
