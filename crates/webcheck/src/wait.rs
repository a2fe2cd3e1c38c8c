//! Explicit waits.
//!
//! Polls a session until a condition holds or the configured element
//! timeout elapses. There are no implicit retries anywhere else.

use crate::config::Timeouts;
use crate::driver::BrowserSession;
use crate::locator::Selector;
use crate::result::{WebcheckError, WebcheckResult};
use std::time::Duration;
use tokio::time::Instant;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::from(&Timeouts::default())
    }
}

impl From<&Timeouts> for WaitOptions {
    fn from(timeouts: &Timeouts) -> Self {
        Self {
            timeout_ms: timeouts.element_ms,
            poll_interval_ms: timeouts.poll_interval_ms.max(1),
        }
    }
}

impl WaitOptions {
    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds (at least 1)
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms.max(1);
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Wait until `selector` is visible
///
/// The condition is checked at least once, even with a zero timeout.
pub async fn wait_for_visible(
    session: &mut dyn BrowserSession,
    selector: &Selector,
    options: WaitOptions,
) -> WebcheckResult<()> {
    let deadline = Instant::now() + options.timeout();
    loop {
        if session.is_visible(selector).await? {
            tracing::debug!(%selector, "element visible");
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(WebcheckError::Timeout {
                operation: format!("wait for {selector} to be visible"),
                ms: options.timeout_ms,
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}
