//! `dsjson` command-line converter.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use dsjson_cli::commands::{
    RunContext, load_define, run_datasets, run_to_csv, run_to_json, run_to_xpt,
};
use dsjson_cli::config::Config;
use dsjson_cli::logging::{LogConfig, LogFormat, init_logging};
use dsjson_cli::types::BatchResult;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{print_columns, print_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = Config::load(cli.config.as_deref())?;
    let define = load_define(cli.define.as_deref())?;
    let ctx = RunContext::new(&config, define.as_ref());

    let result = match &cli.command {
        Command::ToCsv(args) => run_to_csv(&args.inputs, &args.output_folder, ctx)?,
        Command::ToXpt(args) => run_to_xpt(&args.inputs, &args.output_folder, ctx)?,
        Command::ToJson(args) => run_to_json(&args.inputs, &args.output_folder, ctx)?,
        Command::Datasets(args) => {
            print_columns(&run_datasets(&args.input, ctx)?);
            return Ok(0);
        }
    };
    Ok(report(&result))
}

fn report(result: &BatchResult) -> i32 {
    print_summary(result);
    i32::from(result.has_errors())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
