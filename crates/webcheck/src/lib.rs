//! Webcheck: end-to-end checks for a demo web application and a posts API
//!
//! Page objects drive a browser through the [`BrowserSession`] trait; the
//! posts scenarios go through a typed [`PostsClient`]. The harness runs both
//! kinds of case sequentially and collects one [`TestResult`] per case.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌────────────────┐
//! │ Scenarios  │───►│ Page Object │───►│ BrowserSession │──► chromium (CDP)
//! │ (harness)  │    └─────────────┘    └────────────────┘    or MockSession
//! │            │    ┌─────────────┐
//! │            │───►│ PostsClient │──────────────────────────► /posts API
//! └────────────┘    └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! let config = SuiteConfig::load(None)?;
//! let browser = Browser::launch(&config.browser).await?;
//! let results = TestHarness::new()
//!     .run(&scenarios::suite_for(None), &config, Some(&browser))
//!     .await;
//! assert!(results.all_passed());
//! ```

#![warn(missing_docs)]

pub mod api;
mod assertion;
#[cfg(feature = "browser")]
mod browser;
pub mod config;
mod driver;
mod fixture;
mod harness;
mod locator;
pub mod mock_app;
pub mod network;
mod page_object;
pub mod pages;
mod result;
pub mod scenarios;
pub mod wait;

pub use api::{ApiResponse, NewPost, Post, PostPatch, PostsClient};
pub use assertion::{Assertion, AssertionResult};
#[cfg(feature = "browser")]
pub use browser::{Browser, ChromiumSession};
pub use config::{BrowserSettings, Credentials, SuiteConfig, Timeouts};
pub use driver::{
    BrowserSession, ClickEffect, ElementText, FetchResponse, Journal, MockDom, MockElement,
    MockSession, MOCK_PNG,
};
pub use fixture::{run_ui_case, screenshot_file_name, screenshot_path, SessionProvider};
pub use harness::{
    ApiCaseFn, CaseBody, SuiteKind, SuiteResults, TestCase, TestHarness, TestResult, TestSuite,
    UiCaseFn,
};
pub use locator::{
    DynamicLoadingLocators, FileUploadLocators, LocatorConfig, LoginLocators, Selector,
};
pub use network::{HttpMethod, MockResponse, Route};
pub use page_object::{goto_with_timeout, PageObject};
pub use pages::{DynamicLoadingPage, FileUploadPage, LoginPage};
pub use result::{WebcheckError, WebcheckResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        Assertion, BrowserSession, Credentials, ElementText, PageObject, PostsClient,
        SuiteConfig, TestHarness, WebcheckError, WebcheckResult,
    };
    pub use super::{DynamicLoadingPage, FileUploadPage, LoginPage};
}
