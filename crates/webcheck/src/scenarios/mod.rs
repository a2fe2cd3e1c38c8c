//! Built-in scenarios for the demo web application and the posts API.

pub mod api;
pub mod ui;

use crate::harness::{SuiteKind, TestSuite};

/// Cases of one suite, or of both when `kind` is `None`
#[must_use]
pub fn suite_for(kind: Option<SuiteKind>) -> TestSuite {
    match kind {
        Some(SuiteKind::Ui) => ui::ui_suite(),
        Some(SuiteKind::Api) => api::api_suite(),
        None => {
            let mut all = TestSuite::new("all").merge(ui::ui_suite());
            all = all.merge(api::api_suite());
            all
        }
    }
}
