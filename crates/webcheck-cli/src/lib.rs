//! webcheck CLI library
//!
//! Argument parsing, logging setup, suite selection and summary output for
//! the `webcheck` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
pub mod runner;

pub use commands::{Cli, ColorArg, Commands, FormatArg, ListArgs, LogFormat, RunArgs, SuiteArg};
pub use config::{ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_case_list, render_json, OutputFormat, ProgressReporter};
