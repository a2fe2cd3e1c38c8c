//! Result and error types for webcheck.

use thiserror::Error;

/// Result type for webcheck operations
pub type WebcheckResult<T> = Result<T, WebcheckError>;

/// Errors that can occur while driving a page or calling the posts API
#[derive(Debug, Error)]
pub enum WebcheckError {
    /// Input rejected before any browser or network interaction
    #[error("Precondition failed: {message}")]
    Precondition {
        /// Error message
        message: String,
    },

    /// A required configuration value is empty
    #[error("Missing configuration: {key} is not set")]
    MissingConfig {
        /// Configuration key (env var name)
        key: String,
    },

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Expected element was absent after retrieval
    #[error("Content not found: {what}")]
    ContentNotFound {
        /// What was being looked up
        what: String,
    },

    /// Element was present but its text was empty
    #[error("Content empty: {what}")]
    ContentEmpty {
        /// What was being looked up
        what: String,
    },

    /// Selector matched nothing when an action needed an element
    #[error("No element matches selector {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Observed value differs from the expected one
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("{operation} timed out after {ms}ms")]
    Timeout {
        /// What was being waited for
        operation: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser launch or page-level CDP error
    #[error("Browser error: {message}")]
    Browser {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Request interception error
    #[error("Interception failed: {message}")]
    Interception {
        /// Error message
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl WebcheckError {
    /// Create a precondition error
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a browser error
    #[must_use]
    pub fn browser(message: impl Into<String>) -> Self {
        Self::Browser {
            message: message.into(),
        }
    }

    /// Whether this error is an assertion mismatch rather than an execution failure
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionFailed { .. })
    }
}
