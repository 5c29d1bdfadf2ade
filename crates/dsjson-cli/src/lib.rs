//! Library side of the `dsjson` command: configuration, input discovery,
//! logging setup and the batch conversions behind each subcommand.

pub mod commands;
pub mod config;
pub mod discovery;
pub mod logging;
pub mod types;
