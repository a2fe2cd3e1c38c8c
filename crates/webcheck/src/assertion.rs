//! Assertions for scenario validation.
//!
//! Each helper yields an [`AssertionResult`]; scenarios turn failures into
//! [`WebcheckError::AssertionFailed`] with `?` via [`AssertionResult::check`].

use crate::result::{WebcheckError, WebcheckResult};
use serde_json::Value;
use std::fmt::Debug;

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Convert into a result, failing with the assertion message
    pub fn check(self) -> WebcheckResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(WebcheckError::assertion(self.message))
        }
    }
}

/// Assertion helpers
#[derive(Debug)]
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug + ?Sized>(expected: &T, actual: &T) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {expected:?}, got {actual:?}"))
        }
    }

    /// Assert a string contains a substring
    #[must_use]
    pub fn contains(haystack: &str, needle: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected '{haystack}' to contain '{needle}'"))
        }
    }

    /// Assert an HTTP status
    #[must_use]
    pub fn status(expected: u16, actual: u16) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected status {expected}, got {actual}"))
        }
    }

    /// Assert an HTTP status is one of `allowed`
    #[must_use]
    pub fn status_in(allowed: &[u16], actual: u16) -> AssertionResult {
        if allowed.contains(&actual) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected status in {allowed:?}, got {actual}"))
        }
    }

    /// Assert `body[field] == expected`
    #[must_use]
    pub fn json_field(body: &Value, field: &str, expected: &Value) -> AssertionResult {
        match body.get(field) {
            Some(actual) if actual == expected => AssertionResult::pass(),
            Some(actual) => AssertionResult::fail(format!(
                "expected {field} = {expected}, got {actual}"
            )),
            None => AssertionResult::fail(format!("response has no field {field}: {body}")),
        }
    }

    /// Assert `body[field]` exists
    #[must_use]
    pub fn has_field(body: &Value, field: &str) -> AssertionResult {
        if body.get(field).is_some() {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("response has no field {field}: {body}"))
        }
    }
}
