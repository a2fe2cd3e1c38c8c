//! Browser Session Abstraction
//!
//! Page objects talk to a [`BrowserSession`] rather than to a concrete
//! browser. The CDP implementation lives in [`crate::browser`]; this module
//! holds the trait and [`MockSession`], a scripted in-memory DOM used by the
//! offline tests.

use crate::locator::Selector;
use crate::network::{HttpMethod, NetworkInterception, Route, RouteDecision};
use crate::result::{WebcheckError, WebcheckResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Outcome of a text lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementText {
    /// Element exists; its `textContent`
    Found(String),
    /// Selector matched nothing
    NotFound,
}

impl ElementText {
    /// Text if found
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Found(text) => Some(text),
            Self::NotFound => None,
        }
    }

    /// Whether the element was found
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Strict conversion: absent and empty become distinct errors
    pub fn require(self, what: &str) -> WebcheckResult<String> {
        match self {
            Self::NotFound => Err(WebcheckError::ContentNotFound {
                what: what.to_string(),
            }),
            Self::Found(text) if text.trim().is_empty() => Err(WebcheckError::ContentEmpty {
                what: what.to_string(),
            }),
            Self::Found(text) => Ok(text),
        }
    }
}

impl From<Option<String>> for ElementText {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

/// Response to an in-page `fetch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl FetchResponse {
    /// Parse the body as JSON
    pub fn json(&self) -> WebcheckResult<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// A live page that page objects drive
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to URL and wait for the load to finish
    async fn goto(&mut self, url: &str) -> WebcheckResult<()>;

    /// Replace the value of a text input
    async fn fill(&mut self, selector: &Selector, value: &str) -> WebcheckResult<()>;

    /// Click element
    async fn click(&mut self, selector: &Selector) -> WebcheckResult<()>;

    /// Set the files of a file input control
    async fn set_input_files(&mut self, selector: &Selector, files: &[PathBuf])
        -> WebcheckResult<()>;

    /// Read an element's text content
    async fn text_content(&mut self, selector: &Selector) -> WebcheckResult<ElementText>;

    /// Whether the element exists and is rendered
    async fn is_visible(&mut self, selector: &Selector) -> WebcheckResult<bool>;

    /// Capture the viewport as PNG bytes
    async fn screenshot(&mut self) -> WebcheckResult<Vec<u8>>;

    /// Install an interception route for requests issued by the page
    async fn route(&mut self, route: Route) -> WebcheckResult<()>;

    /// Issue a request from within the page
    async fn fetch(&mut self, url: &str, method: HttpMethod) -> WebcheckResult<FetchResponse>;

    /// Current URL
    async fn current_url(&mut self) -> WebcheckResult<String>;

    /// Close the page
    async fn close(&mut self) -> WebcheckResult<()>;
}

/// An element in the mock DOM
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    /// Text content
    pub text: String,
    /// Current input value
    pub value: String,
    /// Files chosen on a file input
    pub files: Vec<PathBuf>,
    /// Whether the element is rendered
    pub visible: bool,
    /// Visibility checks that must happen before a hidden element appears
    pub reveal_after_polls: Option<u32>,
}

impl MockElement {
    /// A visible element with text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            ..Self::default()
        }
    }

    /// A visible element with no text (inputs, buttons)
    #[must_use]
    pub fn control() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// A hidden element with text
    #[must_use]
    pub fn hidden(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: false,
            ..Self::default()
        }
    }
}

/// Elements currently loaded in a [`MockSession`], keyed by selector text
#[derive(Debug, Clone, Default)]
pub struct MockDom {
    elements: HashMap<String, MockElement>,
}

impl MockDom {
    /// Add or replace an element
    pub fn insert(&mut self, selector: &Selector, element: MockElement) {
        self.elements.insert(selector.as_str().to_string(), element);
    }

    /// Look up an element
    #[must_use]
    pub fn get(&self, selector: &Selector) -> Option<&MockElement> {
        self.elements.get(selector.as_str())
    }

    /// Look up an element mutably
    pub fn get_mut(&mut self, selector: &Selector) -> Option<&mut MockElement> {
        self.elements.get_mut(selector.as_str())
    }

    /// Current value of an input, empty when absent
    #[must_use]
    pub fn value_of(&self, selector: &Selector) -> String {
        self.get(selector).map(|e| e.value.clone()).unwrap_or_default()
    }

    fn require_mut(&mut self, selector: &Selector) -> WebcheckResult<&mut MockElement> {
        self.elements
            .get_mut(selector.as_str())
            .ok_or_else(|| WebcheckError::ElementNotFound {
                selector: selector.to_string(),
            })
    }
}

/// Script run against the DOM when an element is clicked
pub type ClickEffect = Box<dyn Fn(&mut MockDom) + Send + Sync>;

/// Scripted in-memory session
///
/// Pages are registered per URL suffix; `goto` loads a fresh copy of the
/// matching page's elements. Click effects mutate the DOM the way the real
/// page's scripts would.
#[derive(Default)]
pub struct MockSession {
    pages: Vec<(String, MockDom)>,
    click_effects: HashMap<String, ClickEffect>,
    dom: MockDom,
    current_url: String,
    interception: NetworkInterception,
    network: HashMap<(String, HttpMethod), FetchResponse>,
    screenshot_data: Vec<u8>,
    fail_screenshot: bool,
    fail_navigation: bool,
    closed: bool,
    journal: Option<Journal>,
    /// Call history for verification
    pub call_history: Vec<String>,
}

/// Call log shared with a session that has been handed off (e.g. to a fixture)
pub type Journal = Arc<Mutex<Vec<String>>>;

impl fmt::Debug for MockSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSession")
            .field("current_url", &self.current_url)
            .field("pages", &self.pages.len())
            .field("click_effects", &self.click_effects.len())
            .field("closed", &self.closed)
            .field("call_history", &self.call_history)
            .finish_non_exhaustive()
    }
}

/// Minimal PNG signature returned by mock screenshots
pub const MOCK_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

impl MockSession {
    /// Create new mock session
    #[must_use]
    pub fn new() -> Self {
        Self {
            screenshot_data: MOCK_PNG.to_vec(),
            ..Self::default()
        }
    }

    /// Register the DOM loaded when navigating to a URL ending in `path`
    #[must_use]
    pub fn with_page(mut self, path: impl Into<String>, dom: MockDom) -> Self {
        self.pages.push((path.into(), dom));
        self
    }

    /// Register a script run when `selector` is clicked
    #[must_use]
    pub fn on_click<F>(mut self, selector: &Selector, effect: F) -> Self
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        self.click_effects
            .insert(selector.as_str().to_string(), Box::new(effect));
        self
    }

    /// Response for an unintercepted in-page request
    #[must_use]
    pub fn with_network_response(
        mut self,
        url: impl Into<String>,
        method: HttpMethod,
        response: FetchResponse,
    ) -> Self {
        self.network.insert((url.into(), method), response);
        self
    }

    /// Make every screenshot fail
    #[must_use]
    pub const fn failing_screenshots(mut self) -> Self {
        self.fail_screenshot = true;
        self
    }

    /// Make every navigation fail
    #[must_use]
    pub const fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    /// Mirror every recorded call into `journal`
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    fn record(&mut self, call: String) {
        if let Some(journal) = &self.journal {
            if let Ok(mut log) = journal.lock() {
                log.push(call.clone());
            }
        }
        self.call_history.push(call);
    }

    /// Current DOM
    #[must_use]
    pub const fn dom(&self) -> &MockDom {
        &self.dom
    }

    /// Whether `close` has been called
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn goto(&mut self, url: &str) -> WebcheckResult<()> {
        self.record(format!("goto:{url}"));
        if self.fail_navigation {
            return Err(WebcheckError::Navigation {
                url: url.to_string(),
                message: "mock navigation failure".to_string(),
            });
        }
        self.dom = self
            .pages
            .iter()
            .find(|(path, _)| url.ends_with(path.as_str()))
            .map(|(_, dom)| dom.clone())
            .unwrap_or_default();
        self.current_url = url.to_string();
        Ok(())
    }

    async fn fill(&mut self, selector: &Selector, value: &str) -> WebcheckResult<()> {
        self.record(format!("fill:{selector}"));
        self.dom.require_mut(selector)?.value = value.to_string();
        Ok(())
    }

    async fn click(&mut self, selector: &Selector) -> WebcheckResult<()> {
        self.record(format!("click:{selector}"));
        self.dom.require_mut(selector)?;
        if let Some(effect) = self.click_effects.get(selector.as_str()) {
            effect(&mut self.dom);
        }
        Ok(())
    }

    async fn set_input_files(
        &mut self,
        selector: &Selector,
        files: &[PathBuf],
    ) -> WebcheckResult<()> {
        self.record(format!("set_input_files:{selector}"));
        self.dom.require_mut(selector)?.files = files.to_vec();
        Ok(())
    }

    async fn text_content(&mut self, selector: &Selector) -> WebcheckResult<ElementText> {
        self.record(format!("text_content:{selector}"));
        Ok(self.dom.get(selector).map(|e| e.text.clone()).into())
    }

    async fn is_visible(&mut self, selector: &Selector) -> WebcheckResult<bool> {
        self.record(format!("is_visible:{selector}"));
        let Some(element) = self.dom.get_mut(selector) else {
            return Ok(false);
        };
        if let Some(remaining) = element.reveal_after_polls {
            if remaining == 0 {
                element.visible = true;
                element.reveal_after_polls = None;
            } else {
                element.reveal_after_polls = Some(remaining - 1);
            }
        }
        Ok(element.visible)
    }

    async fn screenshot(&mut self) -> WebcheckResult<Vec<u8>> {
        self.record("screenshot".to_string());
        if self.fail_screenshot {
            return Err(WebcheckError::Screenshot {
                message: "mock screenshot failure".to_string(),
            });
        }
        Ok(self.screenshot_data.clone())
    }

    async fn route(&mut self, route: Route) -> WebcheckResult<()> {
        self.record(format!("route:{}", route.url));
        self.interception.route(route);
        Ok(())
    }

    async fn fetch(&mut self, url: &str, method: HttpMethod) -> WebcheckResult<FetchResponse> {
        self.record(format!("fetch:{}:{url}", method.as_str()));
        match self.interception.handle_request(url, method) {
            RouteDecision::Fulfill(resp) => Ok(FetchResponse {
                status: resp.status,
                body: resp.body_string(),
            }),
            RouteDecision::Continue => self
                .network
                .get(&(url.to_string(), method))
                .cloned()
                .ok_or_else(|| WebcheckError::Interception {
                    message: format!("no mock network response for {} {url}", method.as_str()),
                }),
        }
    }

    async fn current_url(&mut self) -> WebcheckResult<String> {
        Ok(self.current_url.clone())
    }

    async fn close(&mut self) -> WebcheckResult<()> {
        self.record("close".to_string());
        self.closed = true;
        Ok(())
    }
}
