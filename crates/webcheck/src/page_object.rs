//! Page Object Model support.
//!
//! Every screen of the application under test gets one page object: a thin
//! facade over a [`BrowserSession`] and the screen's locator map. Page
//! objects are single-state; they assume their page is loaded once
//! `navigate` has returned.

use crate::driver::BrowserSession;
use crate::result::{WebcheckError, WebcheckResult};
use std::time::Duration;

/// Trait for page objects representing a page of the application.
///
/// # Example
///
/// ```ignore
/// impl PageObject for LoginPage<'_> {
///     fn path(&self) -> &'static str {
///         "/login"
///     }
/// }
///
/// let mut page = LoginPage::new(&mut session, &config);
/// page.navigate().await?;
/// page.login(&config.credentials).await?;
/// ```
pub trait PageObject {
    /// Path relative to the base URL (e.g., "/login")
    fn path(&self) -> &'static str;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("page")
    }

    /// Absolute URL of the page
    fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

/// Navigate `session` to `url`, bounded by `timeout_ms`
pub async fn goto_with_timeout(
    session: &mut dyn BrowserSession,
    url: &str,
    timeout_ms: u64,
) -> WebcheckResult<()> {
    tracing::info!(url, "navigating");
    match tokio::time::timeout(Duration::from_millis(timeout_ms), session.goto(url)).await {
        Ok(result) => result,
        Err(_) => Err(WebcheckError::Timeout {
            operation: format!("navigation to {url}"),
            ms: timeout_ms,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::MockSession;

    struct ReportsPage;

    impl PageObject for ReportsPage {
        fn path(&self) -> &'static str {
            "/reports"
        }
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(ReportsPage.url("https://host/"), "https://host/reports");
        assert_eq!(ReportsPage.url("https://host"), "https://host/reports");
    }

    #[test]
    fn test_page_name_is_short_type_name() {
        assert_eq!(ReportsPage.page_name(), "ReportsPage");
    }

    #[tokio::test]
    async fn test_goto_with_timeout_propagates_navigation_error() {
        let mut session = MockSession::new().failing_navigation();
        let err = goto_with_timeout(&mut session, "https://host/reports", 1000)
            .await
            .unwrap_err();
        assert!(matches!(err, WebcheckError::Navigation { .. }));
    }

    #[tokio::test]
    async fn test_goto_with_timeout_ok() {
        let mut session = MockSession::new();
        goto_with_timeout(&mut session, "https://host/reports", 1000)
            .await
            .unwrap();
        assert!(session.was_called("goto:https://host/reports"));
    }
}
