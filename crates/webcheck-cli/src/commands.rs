//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use webcheck::SuiteKind;

/// webcheck: end-to-end checks for the demo web app and the posts API
#[derive(Parser, Debug)]
#[command(name = "webcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run test cases against the live services
    Run(RunArgs),

    /// List test case titles
    List(ListArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Which suite to run
    #[arg(short, long, default_value = "all")]
    pub suite: SuiteArg,

    /// Only run cases whose title contains this text (case-insensitive)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// YAML configuration file (defaults to ./webcheck.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Stop after the first failing case
    #[arg(long)]
    pub fail_fast: bool,

    /// Summary format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Which suite to list
    #[arg(short, long, default_value = "all")]
    pub suite: SuiteArg,
}

/// Suite selector
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuiteArg {
    /// Web UI cases
    Ui,
    /// Posts API cases
    Api,
    /// Both
    #[default]
    All,
}

impl From<SuiteArg> for Option<SuiteKind> {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Ui => Some(SuiteKind::Ui),
            SuiteArg::Api => Some(SuiteKind::Api),
            SuiteArg::All => None,
        }
    }
}

/// Summary format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Log format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable colored lines
    #[default]
    Pretty,
    /// JSON lines
    Json,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::parse_from(["webcheck", "run"]);
            if let Commands::Run(args) = cli.command {
                assert_eq!(args.suite, SuiteArg::All);
                assert_eq!(args.format, FormatArg::Text);
                assert!(args.filter.is_none());
                assert!(!args.headed);
                assert!(!args.fail_fast);
            } else {
                panic!("expected Run command");
            }
            assert_eq!(cli.log_format, LogFormat::Pretty);
        }

        #[test]
        fn test_parse_run_with_everything() {
            let cli = Cli::parse_from([
                "webcheck",
                "run",
                "--suite",
                "api",
                "--filter",
                "PATCH",
                "--config",
                "ci.yaml",
                "--headed",
                "--fail-fast",
                "--format",
                "json",
            ]);
            if let Commands::Run(args) = cli.command {
                assert_eq!(args.suite, SuiteArg::Api);
                assert_eq!(args.filter.as_deref(), Some("PATCH"));
                assert_eq!(args.config, Some(PathBuf::from("ci.yaml")));
                assert!(args.headed);
                assert!(args.fail_fast);
                assert_eq!(args.format, FormatArg::Json);
            } else {
                panic!("expected Run command");
            }
        }

        #[test]
        fn test_parse_list() {
            let cli = Cli::parse_from(["webcheck", "list", "--suite", "ui"]);
            assert!(matches!(
                cli.command,
                Commands::List(ListArgs {
                    suite: SuiteArg::Ui
                })
            ));
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::parse_from(["webcheck", "list", "-vv", "--log-format", "json"]);
            assert_eq!(cli.verbose, 2);
            assert_eq!(cli.log_format, LogFormat::Json);
        }

        #[test]
        fn test_unknown_suite_rejected() {
            assert!(Cli::try_parse_from(["webcheck", "run", "--suite", "smoke"]).is_err());
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_suite_arg_to_kind() {
            assert_eq!(Option::<SuiteKind>::from(SuiteArg::Ui), Some(SuiteKind::Ui));
            assert_eq!(Option::<SuiteKind>::from(SuiteArg::Api), Some(SuiteKind::Api));
            assert_eq!(Option::<SuiteKind>::from(SuiteArg::All), None);
        }
    }
}
