//! webcheck: run the demo web app and posts API scenarios
//!
//! ## Usage
//!
//! ```bash
//! webcheck run                          # Run every case
//! webcheck run --suite api --format json
//! webcheck run --filter login --headed  # Watch the login cases
//! webcheck list --suite ui
//! ```

use clap::Parser;
use std::process::ExitCode;
use webcheck_cli::{
    logging, render_case_list, render_json, runner, Cli, CliResult, ColorChoice, Commands,
    ListArgs, OutputFormat, ProgressReporter, RunArgs, Verbosity,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    logging::init_tracing(cli.log_format, verbosity)?;
    let use_color = ColorChoice::from(cli.color).should_color();

    match cli.command {
        Commands::Run(args) => run_cases(&args, verbosity, use_color).await,
        Commands::List(args) => {
            list_cases(&args);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_cases(args: &RunArgs, verbosity: Verbosity, use_color: bool) -> CliResult<ExitCode> {
    let config = runner::load_config(args)?;
    let suite = runner::select_suite(args)?;
    let format = OutputFormat::from(args.format);

    // JSON mode keeps stdout for the document alone
    let mut reporter = ProgressReporter::new(use_color, verbosity.is_quiet());
    if format == OutputFormat::Json {
        reporter = reporter.to_stderr();
    }
    reporter.header(&format!("webcheck: {} ({} cases)", suite.name, suite.test_count()));
    reporter.start_progress(suite.test_count() as u64, &suite.name);

    let results = runner::run_suite(&suite, &config, args.fail_fast, &reporter).await?;
    reporter.finish();

    match format {
        OutputFormat::Text => {
            reporter.summary(results.passed_count(), results.failed_count(), results.duration);
        }
        OutputFormat::Json => println!("{}", render_json(&results)?),
    }

    Ok(if results.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list_cases(args: &ListArgs) {
    let suite = webcheck::scenarios::suite_for(args.suite.into());
    println!("{}", render_case_list(&suite.tests));
}
