//! Suite selection and execution for the `run` command

use crate::commands::RunArgs;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use tracing::info;
use webcheck::{scenarios, SuiteConfig, SuiteResults, TestHarness, TestSuite};

/// Load configuration for a run, applying command-line overrides
pub fn load_config(args: &RunArgs) -> CliResult<SuiteConfig> {
    let config =
        SuiteConfig::load(args.config.as_deref()).map_err(|e| CliError::config(e.to_string()))?;
    Ok(if args.headed {
        config.with_headless(false)
    } else {
        config
    })
}

/// Cases selected by `--suite` and `--filter`
pub fn select_suite(args: &RunArgs) -> CliResult<TestSuite> {
    let suite = scenarios::suite_for(args.suite.into());
    let suite = match args.filter {
        Some(ref needle) => suite.filtered(needle),
        None => suite,
    };
    if suite.test_count() == 0 {
        return Err(CliError::config(format!(
            "no test case matches filter '{}'",
            args.filter.as_deref().unwrap_or_default()
        )));
    }
    Ok(suite)
}

/// Run the selected cases, launching a browser only when a case needs one
pub async fn run_suite(
    suite: &TestSuite,
    config: &SuiteConfig,
    fail_fast: bool,
    reporter: &ProgressReporter,
) -> CliResult<SuiteResults> {
    let harness = if fail_fast {
        TestHarness::new().with_fail_fast()
    } else {
        TestHarness::new()
    };

    if !suite.needs_browser() {
        info!(cases = suite.test_count(), "running without a browser");
        return Ok(harness
            .run_with(suite, config, None, |r| reporter.case_finished(r))
            .await);
    }

    run_with_browser(&harness, suite, config, reporter).await
}

#[cfg(feature = "browser")]
async fn run_with_browser(
    harness: &TestHarness,
    suite: &TestSuite,
    config: &SuiteConfig,
    reporter: &ProgressReporter,
) -> CliResult<SuiteResults> {
    use webcheck::{Browser, SessionProvider};

    let browser = Browser::launch(&config.browser)
        .await
        .map_err(|e| CliError::browser_launch(e.to_string()))?;
    let provider: &dyn SessionProvider = &browser;
    let results = harness
        .run_with(suite, config, Some(provider), |r| reporter.case_finished(r))
        .await;
    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "closing browser failed");
    }
    Ok(results)
}

#[cfg(not(feature = "browser"))]
async fn run_with_browser(
    _harness: &TestHarness,
    _suite: &TestSuite,
    _config: &SuiteConfig,
    _reporter: &ProgressReporter,
) -> CliResult<SuiteResults> {
    Err(CliError::browser_launch(
        "UI cases need the `browser` feature; rebuild with --features browser",
    ))
}
