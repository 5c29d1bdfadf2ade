//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dsjson",
    version,
    about = "Convert between Dataset-JSON, SAS transport (XPT) and CSV",
    long_about = "Convert clinical datasets between Dataset-JSON, SAS transport (XPT) and CSV.\n\n\
                  Define-XML metadata can supply display formats, lengths, data types\n\
                  and study identifiers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with `[prefixes]` and `[oids]` settings.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Define-XML file describing the datasets.
    #[arg(long, value_name = "FILE", global = true)]
    pub define: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write every dataset of each Dataset-JSON file as CSV.
    ToCsv(ConvertArgs),

    /// Write every dataset of each Dataset-JSON file as XPT.
    ToXpt(ConvertArgs),

    /// Write every member of each XPT library as Dataset-JSON.
    ToJson(ConvertArgs),

    /// List the datasets and columns of a Dataset-JSON or Define-XML file.
    Datasets(DatasetsArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Input files, or folders whose matching files are converted.
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Existing folder receiving the output files.
    #[arg(value_name = "OUTPUT_FOLDER")]
    pub output_folder: PathBuf,
}

#[derive(Args)]
pub struct DatasetsArgs {
    /// Dataset-JSON (`.json`) or Define-XML (`.xml`) file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
