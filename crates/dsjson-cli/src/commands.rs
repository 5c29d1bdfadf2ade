//! Batch conversions behind each subcommand.
//!
//! A failing file is logged and recorded in its [`FileSummary`]; the batch
//! carries on with the next file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dsjson_convert::{
    DatasetJsonReader, MetadataSource, write_csv, write_dataset_json, write_xpt,
};
use dsjson_define::DefineMetadata;
use dsjson_model::{Dataset, DatasetCollection};
use tracing::{error, info, info_span};

use crate::config::Config;
use crate::discovery::discover_inputs;
use crate::types::{BatchResult, ColumnListing, FileSummary};

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    pub config: &'a Config,
    pub define: Option<&'a DefineMetadata>,
}

impl<'a> RunContext<'a> {
    pub fn new(config: &'a Config, define: Option<&'a DefineMetadata>) -> Self {
        Self { config, define }
    }

    fn metadata(&self) -> MetadataSource<'a> {
        self.define.into()
    }

    /// Study and metadata-version OIDs: the Define's when given, else the config's.
    fn oids(&self) -> (&'a str, &'a str) {
        match self.define {
            Some(define) => (define.study_oid(), define.metadata_version_oid()),
            None => (
                self.config.oids.study_oid.as_str(),
                self.config.oids.metadata_version_oid.as_str(),
            ),
        }
    }
}

/// Load the Define-XML given with `--define`.
pub fn load_define(path: Option<&Path>) -> Result<Option<DefineMetadata>> {
    path.map(|path| {
        DefineMetadata::from_path(path).with_context(|| format!("load Define-XML {}", path.display()))
    })
    .transpose()
}

pub fn run_to_csv(inputs: &[PathBuf], output_dir: &Path, ctx: RunContext<'_>) -> Result<BatchResult> {
    run_json_batch("to-csv", inputs, output_dir, ctx, |reader, name| {
        Ok(write_csv(output_dir, reader, name)?)
    })
}

pub fn run_to_xpt(inputs: &[PathBuf], output_dir: &Path, ctx: RunContext<'_>) -> Result<BatchResult> {
    run_json_batch("to-xpt", inputs, output_dir, ctx, |reader, name| {
        Ok(write_xpt(output_dir, reader, name, ctx.metadata())?)
    })
}

pub fn run_to_json(inputs: &[PathBuf], output_dir: &Path, ctx: RunContext<'_>) -> Result<BatchResult> {
    let files = discover_inputs(inputs, "xpt")?;
    let options = ctx.config.json_export_options();
    let (study_oid, metadata_version_oid) = ctx.oids();

    let summaries = files
        .into_iter()
        .map(|input| {
            let _span = info_span!("file", path = %input.display()).entered();
            let outcome = write_dataset_json(
                &input,
                study_oid,
                metadata_version_oid,
                output_dir,
                &options,
                ctx.metadata(),
            )
            .with_context(|| format!("convert {}", input.display()));
            match outcome {
                Ok(outputs) => FileSummary {
                    datasets: outputs.iter().filter_map(|p| dataset_stem(p)).collect(),
                    input,
                    outputs,
                    error: None,
                },
                Err(err) => failed(input, &err),
            }
        })
        .collect();

    Ok(finish("to-json", output_dir, summaries))
}

/// Columns of every dataset in a Dataset-JSON or Define-XML file.
pub fn run_datasets(input: &Path, ctx: RunContext<'_>) -> Result<Vec<ColumnListing>> {
    let is_xml = input
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));

    let listing = if is_xml {
        let define = DefineMetadata::from_path(input)
            .with_context(|| format!("load Define-XML {}", input.display()))?;
        list_columns(define.datasets())
    } else {
        let reader = DatasetJsonReader::open(input, &ctx.config.prefixes.item_group_prefix)
            .with_context(|| format!("load Dataset-JSON {}", input.display()))?;
        list_columns(reader.datasets())
    };
    Ok(listing)
}

fn list_columns(datasets: &[Dataset]) -> Vec<ColumnListing> {
    datasets
        .iter()
        .flat_map(|dataset| {
            dataset.columns().map(|column| ColumnListing {
                dataset: dataset.name.clone(),
                column: column.name.clone(),
                data_type: column.data_type.clone(),
                length: column.length,
                label: column.label.clone(),
            })
        })
        .collect()
}

/// Convert every dataset of every Dataset-JSON input with `convert`.
fn run_json_batch<F>(
    command: &'static str,
    inputs: &[PathBuf],
    output_dir: &Path,
    ctx: RunContext<'_>,
    convert: F,
) -> Result<BatchResult>
where
    F: Fn(&DatasetJsonReader, &str) -> Result<PathBuf>,
{
    let files = discover_inputs(inputs, "json")?;
    let prefix = &ctx.config.prefixes.item_group_prefix;

    let summaries = files
        .into_iter()
        .map(|input| {
            let _span = info_span!("file", path = %input.display()).entered();
            match convert_json_file(&input, prefix, &convert) {
                Ok((datasets, outputs)) => FileSummary {
                    input,
                    datasets,
                    outputs,
                    error: None,
                },
                Err(err) => failed(input, &err),
            }
        })
        .collect();

    Ok(finish(command, output_dir, summaries))
}

fn convert_json_file<F>(input: &Path, prefix: &str, convert: &F) -> Result<(Vec<String>, Vec<PathBuf>)>
where
    F: Fn(&DatasetJsonReader, &str) -> Result<PathBuf>,
{
    let reader = DatasetJsonReader::open(input, prefix)
        .with_context(|| format!("load Dataset-JSON {}", input.display()))?;
    let datasets: Vec<String> = reader.dataset_names().into_iter().map(str::to_string).collect();

    let mut outputs = Vec::with_capacity(datasets.len());
    for name in &datasets {
        let path = convert(&reader, name).with_context(|| format!("convert dataset {name}"))?;
        outputs.push(path);
    }
    Ok((datasets, outputs))
}

fn failed(input: PathBuf, err: &anyhow::Error) -> FileSummary {
    let message = format!("{err:#}");
    error!(path = %input.display(), error = %message, "conversion failed");
    FileSummary {
        input,
        datasets: Vec::new(),
        outputs: Vec::new(),
        error: Some(message),
    }
}

fn finish(command: &'static str, output_dir: &Path, files: Vec<FileSummary>) -> BatchResult {
    let result = BatchResult {
        command,
        output_dir: output_dir.to_path_buf(),
        files,
    };
    info!(
        command,
        files = result.files.len(),
        failed = result.failed(),
        "batch finished"
    );
    result
}

fn dataset_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_uppercase)
}
