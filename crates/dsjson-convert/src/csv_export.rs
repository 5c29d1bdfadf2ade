//! CSV output of a projected dataset.

use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, SerWriter};
use tracing::info;

use crate::error::Result;
use crate::output::{output_path, write_atomic};
use crate::reader::DatasetJsonReader;

/// Write one dataset to `<dest>/<name>.csv`, record sequence first.
///
/// Nulls are written as empty fields.
pub fn write_csv(dest: &Path, reader: &DatasetJsonReader, dataset_name: &str) -> Result<PathBuf> {
    let dataset = reader.require_dataset(dataset_name)?;
    let frame = reader.to_frame(dataset_name)?;
    let mut df = frame.to_indexed_frame()?;

    let path = output_path(dest, &dataset.name, "csv")?;
    write_atomic(&path, |file| {
        CsvWriter::new(file).include_header(true).finish(&mut df)?;
        Ok(())
    })?;

    info!(
        dataset = %dataset.name,
        rows = df.height(),
        path = %path.display(),
        "wrote CSV"
    );
    Ok(path)
}
