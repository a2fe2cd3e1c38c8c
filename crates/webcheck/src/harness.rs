//! Test harness for running suites.
//!
//! Cases run one after another. A failing case is recorded and the run goes
//! on, unless fail-fast is set.

use crate::api::PostsClient;
use crate::config::SuiteConfig;
use crate::driver::BrowserSession;
use crate::fixture::{run_ui_case, SessionProvider};
use crate::result::WebcheckResult;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Body of a case that drives a browser session
pub type UiCaseFn =
    for<'a> fn(&'a mut dyn BrowserSession, &'a SuiteConfig) -> BoxFuture<'a, WebcheckResult<()>>;

/// Body of a case that only calls the posts API
pub type ApiCaseFn =
    for<'a> fn(&'a PostsClient, &'a SuiteConfig) -> BoxFuture<'a, WebcheckResult<()>>;

/// Which suite a case belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteKind {
    /// Web UI scenarios
    Ui,
    /// Posts API scenarios
    Api,
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ui => write!(f, "ui"),
            Self::Api => write!(f, "api"),
        }
    }
}

/// What a case needs to run
#[derive(Clone, Copy)]
pub enum CaseBody {
    /// Runs inside the session fixture
    Ui(UiCaseFn),
    /// Runs against the shared posts client
    Api(ApiCaseFn),
}

impl fmt::Debug for CaseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ui(_) => write!(f, "Ui(..)"),
            Self::Api(_) => write!(f, "Api(..)"),
        }
    }
}

/// A single test case
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Test name, also the screenshot stem
    pub name: String,
    /// Suite the case is listed under
    pub suite: SuiteKind,
    /// Case body
    pub body: CaseBody,
}

impl TestCase {
    /// A browser case in the UI suite
    #[must_use]
    pub fn ui(name: impl Into<String>, body: UiCaseFn) -> Self {
        Self {
            name: name.into(),
            suite: SuiteKind::Ui,
            body: CaseBody::Ui(body),
        }
    }

    /// An HTTP-only case in the API suite
    #[must_use]
    pub fn api(name: impl Into<String>, body: ApiCaseFn) -> Self {
        Self {
            name: name.into(),
            suite: SuiteKind::Api,
            body: CaseBody::Api(body),
        }
    }

    /// List the case under another suite
    #[must_use]
    pub const fn in_suite(mut self, suite: SuiteKind) -> Self {
        self.suite = suite;
        self
    }

    /// Whether the case needs a browser session
    #[must_use]
    pub const fn needs_browser(&self) -> bool {
        matches!(self.body, CaseBody::Ui(_))
    }
}

/// A test suite containing multiple tests
#[derive(Debug, Clone)]
pub struct TestSuite {
    /// Suite name
    pub name: String,
    /// Tests in this suite
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    /// Create a new test suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Add a test case
    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Append all cases of another suite
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.tests.extend(other.tests);
        self
    }

    /// Keep only cases whose name contains `needle` (case-insensitive)
    #[must_use]
    pub fn filtered(mut self, needle: &str) -> Self {
        let needle = needle.to_lowercase();
        self.tests
            .retain(|t| t.name.to_lowercase().contains(&needle));
        self
    }

    /// Get the number of tests
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Whether any case needs a browser session
    #[must_use]
    pub fn needs_browser(&self) -> bool {
        self.tests.iter().any(TestCase::needs_browser)
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Result of running a single test
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Test name
    pub name: String,
    /// Whether test passed
    pub passed: bool,
    /// Error message if failed
    pub error: Option<String>,
    /// Test duration
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
    /// Screenshot written for the case
    pub screenshot: Option<PathBuf>,
    /// Teardown problems that did not fail the case
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl TestResult {
    /// Create a passing test result
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            duration: Duration::ZERO,
            screenshot: None,
            warnings: Vec::new(),
        }
    }

    /// Create a failing test result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            duration: Duration::ZERO,
            screenshot: None,
            warnings: Vec::new(),
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set screenshot path
    #[must_use]
    pub fn with_screenshot(mut self, path: Option<PathBuf>) -> Self {
        self.screenshot = path;
        self
    }

    /// Set teardown warnings
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Results from running a test suite
#[derive(Debug, Clone, Serialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Individual test results
    pub results: Vec<TestResult>,
    /// Total duration
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl SuiteResults {
    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Get total test count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }
}

/// Test harness for running suites
#[derive(Debug, Default)]
pub struct TestHarness {
    /// Whether to stop on first failure
    pub fail_fast: bool,
}

impl TestHarness {
    /// Create a new test harness
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Run a test suite
    pub async fn run(
        &self,
        suite: &TestSuite,
        config: &SuiteConfig,
        provider: Option<&dyn SessionProvider>,
    ) -> SuiteResults {
        self.run_with(suite, config, provider, |_| {}).await
    }

    /// Run a test suite, calling `on_result` after each case
    pub async fn run_with<F>(
        &self,
        suite: &TestSuite,
        config: &SuiteConfig,
        provider: Option<&dyn SessionProvider>,
        mut on_result: F,
    ) -> SuiteResults
    where
        F: FnMut(&TestResult),
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut client: Option<PostsClient> = None;
        let mut results = Vec::with_capacity(suite.test_count());

        info!(suite = %suite.name, cases = suite.test_count(), "running suite");
        for case in &suite.tests {
            let result = match case.body {
                CaseBody::Ui(body) => match provider {
                    Some(provider) => run_ui_case(provider, config, &case.name, body).await,
                    None => TestResult::fail(&case.name, "no browser session available"),
                },
                CaseBody::Api(body) => run_api_case(&mut client, config, &case.name, body).await,
            };

            if !result.passed {
                warn!(
                    case = %result.name,
                    error = result.error.as_deref().unwrap_or_default(),
                    "case failed"
                );
            }
            on_result(&result);
            let stop = self.fail_fast && !result.passed;
            results.push(result);
            if stop {
                info!("fail-fast: skipping remaining cases");
                break;
            }
        }

        SuiteResults {
            suite_name: suite.name.clone(),
            started_at,
            results,
            duration: start.elapsed(),
        }
    }
}

async fn run_api_case(
    client: &mut Option<PostsClient>,
    config: &SuiteConfig,
    name: &str,
    body: ApiCaseFn,
) -> TestResult {
    let start = Instant::now();
    if client.is_none() {
        match PostsClient::from_config(config) {
            Ok(built) => *client = Some(built),
            Err(e) => return TestResult::fail(name, e.to_string()),
        }
    }
    let Some(client) = client.as_ref() else {
        return TestResult::fail(name, "posts client unavailable");
    };
    let result = match body(client, config).await {
        Ok(()) => TestResult::pass(name),
        Err(e) => TestResult::fail(name, e.to_string()),
    };
    info!(case = name, passed = result.passed, "api case finished");
    result.with_duration(start.elapsed())
}
