//! XPT file writer.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, XptError};
use crate::float::encode_numeric;
use crate::header::{
    LibraryInfo, NAMESTR_LEN, RECORD_LEN, build_dscrptr_header, build_library_header,
    build_member_data, build_member_header, build_member_second, build_namestr,
    build_namestr_header, build_obs_header, build_real_header, build_second_header, truncate_str,
};
use crate::types::{NumericValue, XptColumn, XptDataset, XptType, XptValue, XptWriterOptions};

/// Longest character variable a V5 file can hold.
pub const MAX_CHAR_LENGTH: u16 = 200;

/// Longest dataset or variable label.
pub const MAX_LABEL_LENGTH: usize = 40;

const MAX_NAME_LENGTH: usize = 8;

/// XPT file writer.
pub struct XptWriter<W: Write> {
    writer: BufWriter<W>,
    options: XptWriterOptions,
}

impl<W: Write> XptWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, XptWriterOptions::default())
    }

    pub fn with_options(writer: W, options: XptWriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
        }
    }

    /// Write a single-member library.
    pub fn write_dataset(self, dataset: &XptDataset) -> Result<()> {
        self.write_library(std::slice::from_ref(dataset))
    }

    /// Write a library containing `datasets` in order.
    ///
    /// Everything is validated before the first byte is written.
    pub fn write_library(mut self, datasets: &[XptDataset]) -> Result<()> {
        for dataset in datasets {
            validate_dataset(dataset)?;
        }

        let info = LibraryInfo::from(&self.options);
        self.writer.write_all(&build_library_header())?;
        self.writer.write_all(&build_real_header(&info))?;
        self.writer.write_all(&build_second_header(&info.modified))?;

        for dataset in datasets {
            self.write_member(dataset)?;
        }

        self.writer.flush()?;
        Ok(())
    }

    fn write_member(&mut self, dataset: &XptDataset) -> Result<()> {
        self.writer.write_all(&build_member_header(NAMESTR_LEN))?;
        self.writer.write_all(&build_dscrptr_header())?;
        self.writer
            .write_all(&build_member_data(dataset, &self.options))?;
        self.writer
            .write_all(&build_member_second(dataset, &self.options))?;

        self.writer
            .write_all(&build_namestr_header(dataset.columns.len()))?;
        self.write_namestr_records(&dataset.columns)?;

        self.writer.write_all(&build_obs_header())?;
        self.write_observations(dataset)
    }

    fn write_namestr_records(&mut self, columns: &[XptColumn]) -> Result<()> {
        let mut record_writer = RecordWriter::new(&mut self.writer);
        let mut position = 0u32;

        for (idx, column) in columns.iter().enumerate() {
            let namestr = build_namestr(column, (idx + 1) as u16, position);
            record_writer.write_bytes(&namestr)?;
            position = position.saturating_add(u32::from(column.length));
        }

        record_writer.finish()
    }

    fn write_observations(&mut self, dataset: &XptDataset) -> Result<()> {
        let obs_len = dataset.observation_length();
        let mut record_writer = RecordWriter::new(&mut self.writer);
        let mut obs = vec![b' '; obs_len];

        for row in &dataset.rows {
            let mut pos = 0usize;
            for (value, column) in row.iter().zip(&dataset.columns) {
                let len = column.length as usize;
                encode_value(value, column, &self.options, &mut obs[pos..pos + len]);
                pos += len;
            }
            record_writer.write_bytes(&obs)?;
        }

        record_writer.finish()
    }
}

impl XptWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        Self::create_with_options(path, XptWriterOptions::default())
    }

    pub fn create_with_options(path: &Path, options: XptWriterOptions) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_options(file, options))
    }
}

/// Write one dataset to an XPT file.
pub fn write_xpt(path: &Path, dataset: &XptDataset) -> Result<()> {
    XptWriter::create(path)?.write_dataset(dataset)
}

pub fn write_xpt_with_options(
    path: &Path,
    dataset: &XptDataset,
    options: &XptWriterOptions,
) -> Result<()> {
    XptWriter::create_with_options(path, options.clone())?.write_dataset(dataset)
}

/// Write several datasets into one XPT library.
pub fn write_xpt_library(
    path: &Path,
    datasets: &[XptDataset],
    options: &XptWriterOptions,
) -> Result<()> {
    XptWriter::create_with_options(path, options.clone())?.write_library(datasets)
}

fn validate_dataset(dataset: &XptDataset) -> Result<()> {
    if !is_valid_name(&dataset.name) {
        return Err(XptError::invalid_dataset_name(&dataset.name));
    }
    if dataset.effective_label().len() > MAX_LABEL_LENGTH {
        return Err(XptError::LabelTooLong {
            name: dataset.name.clone(),
        });
    }

    let mut seen = BTreeSet::new();
    for column in &dataset.columns {
        if !is_valid_name(&column.name) {
            return Err(XptError::invalid_variable_name(&column.name));
        }
        if !seen.insert(column.name.trim().to_uppercase()) {
            return Err(XptError::duplicate_variable(&column.name));
        }
        if column.label_or_empty().len() > MAX_LABEL_LENGTH {
            return Err(XptError::LabelTooLong {
                name: column.name.clone(),
            });
        }
        for format in [&column.format, &column.informat].into_iter().flatten() {
            if format.len() > MAX_NAME_LENGTH {
                return Err(XptError::FormatNameTooLong {
                    name: column.name.clone(),
                    format: format.clone(),
                });
            }
        }

        let valid_length = match column.data_type {
            XptType::Num => (2..=8).contains(&column.length),
            XptType::Char => (1..=MAX_CHAR_LENGTH).contains(&column.length),
        };
        if !valid_length {
            return Err(XptError::InvalidLength {
                name: column.name.clone(),
                length: column.length,
            });
        }
    }

    for (row_idx, row) in dataset.rows.iter().enumerate() {
        if row.len() != dataset.columns.len() {
            return Err(XptError::RowLengthMismatch {
                row: row_idx,
                expected: dataset.columns.len(),
                actual: row.len(),
            });
        }
    }

    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name.len() <= MAX_NAME_LENGTH
}

/// Encode `value` into `out`, which is exactly `column.length` bytes.
///
/// Mismatched kinds are coerced: text in a numeric column is parsed
/// (unparseable text becomes missing), numbers in a character column
/// are formatted.
fn encode_value(value: &XptValue, column: &XptColumn, options: &XptWriterOptions, out: &mut [u8]) {
    match (value, column.data_type) {
        (XptValue::Char(s), XptType::Char) => encode_char(s, out),
        (XptValue::Num(n), XptType::Num) => encode_num(n, options, out),
        (XptValue::Char(s), XptType::Num) => {
            let num = s
                .trim()
                .parse::<f64>()
                .map_or(NumericValue::Missing(options.default_missing), NumericValue::Value);
            encode_num(&num, options, out);
        }
        (XptValue::Num(n), XptType::Char) => {
            let text = match n {
                NumericValue::Value(v) => v.to_string(),
                NumericValue::Missing(_) => String::new(),
            };
            encode_char(&text, out);
        }
    }
}

/// UTF-8 bytes, cut on a character boundary and space-padded.
fn encode_char(value: &str, out: &mut [u8]) {
    let value = truncate_str(value, out.len());
    out.fill(b' ');
    out[..value.len()].copy_from_slice(value.as_bytes());
}

fn encode_num(value: &NumericValue, options: &XptWriterOptions, out: &mut [u8]) {
    let bytes = encode_numeric(value, options.default_missing);
    out.copy_from_slice(&bytes[..out.len()]);
}

/// Packs byte runs into space-padded 80-byte records.
struct RecordWriter<'a, W: Write> {
    writer: &'a mut W,
    record: [u8; RECORD_LEN],
    pos: usize,
}

impl<'a, W: Write> RecordWriter<'a, W> {
    fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            record: [b' '; RECORD_LEN],
            pos: 0,
        }
    }

    fn write_bytes(&mut self, mut bytes: &[u8]) -> Result<()> {
        while !bytes.is_empty() {
            let take = (RECORD_LEN - self.pos).min(bytes.len());
            self.record[self.pos..self.pos + take].copy_from_slice(&bytes[..take]);
            self.pos += take;
            bytes = &bytes[take..];

            if self.pos == RECORD_LEN {
                self.writer.write_all(&self.record)?;
                self.record = [b' '; RECORD_LEN];
                self.pos = 0;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        if self.pos > 0 {
            self.writer.write_all(&self.record)?;
            self.pos = 0;
        }
        Ok(())
    }
}
