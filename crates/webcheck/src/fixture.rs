//! Session fixture for UI cases.
//!
//! [`run_ui_case`] owns the whole lifecycle of one case: open a session, run
//! the body, capture a screenshot, close the session. The last two steps
//! happen whatever the body returned.

use crate::config::SuiteConfig;
use crate::driver::BrowserSession;
use crate::harness::{TestResult, UiCaseFn};
use crate::result::WebcheckResult;
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Source of fresh browser sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Open a new, isolated session
    async fn open_session(&self) -> WebcheckResult<Box<dyn BrowserSession>>;
}

#[async_trait]
impl<F> SessionProvider for F
where
    F: Fn() -> WebcheckResult<Box<dyn BrowserSession>> + Send + Sync,
{
    async fn open_session(&self) -> WebcheckResult<Box<dyn BrowserSession>> {
        self()
    }
}

fn separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid separator pattern"))
}

/// File name for a case's screenshot: runs of non-alphanumerics become `_`
#[must_use]
pub fn screenshot_file_name(title: &str) -> String {
    let sanitized = separators().replace_all(title, "_");
    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "screenshot.png".to_string()
    } else {
        format!("{trimmed}.png")
    }
}

/// Run one UI case inside a fresh session
pub async fn run_ui_case(
    provider: &dyn SessionProvider,
    config: &SuiteConfig,
    title: &str,
    body: UiCaseFn,
) -> TestResult {
    let start = Instant::now();
    let mut session = match provider.open_session().await {
        Ok(session) => session,
        Err(e) => {
            warn!(case = title, error = %e, "could not open session");
            return TestResult::fail(title, e.to_string()).with_duration(start.elapsed());
        }
    };

    let outcome = body(&mut *session, config).await;

    let mut warnings = Vec::new();
    let path = screenshot_path(config, title);
    let screenshot = match capture(&mut *session, &path).await {
        Ok(()) => {
            debug!(case = title, path = %path.display(), "screenshot saved");
            Some(path)
        }
        Err(e) => {
            warn!(case = title, error = %e, "screenshot failed");
            warnings.push(format!("screenshot: {e}"));
            None
        }
    };

    if let Err(e) = session.close().await {
        warn!(case = title, error = %e, "closing session failed");
        warnings.push(format!("close: {e}"));
    }

    let result = match outcome {
        Ok(()) => TestResult::pass(title),
        Err(e) => TestResult::fail(title, e.to_string()),
    };
    info!(case = title, passed = result.passed, "ui case finished");
    result
        .with_duration(start.elapsed())
        .with_screenshot(screenshot)
        .with_warnings(warnings)
}

async fn capture(session: &mut dyn BrowserSession, path: &Path) -> WebcheckResult<()> {
    let png = session.screenshot().await?;
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(path, png).await?;
    Ok(())
}

/// Where [`run_ui_case`] writes the screenshot for `title`
#[must_use]
pub fn screenshot_path(config: &SuiteConfig, title: &str) -> PathBuf {
    config.screenshot_dir.join(screenshot_file_name(title))
}
