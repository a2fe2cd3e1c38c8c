//! Network Request Interception
//!
//! Route table consulted by a browser session before a request leaves the
//! page. A matching route fulfils the request with a fabricated response;
//! anything unmatched continues to the real network.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP methods for request matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// PATCH request
    Patch,
    /// DELETE request
    Delete,
    /// Any method
    Any,
}

impl HttpMethod {
    /// Parse from a CDP/HTTP method string; unknown verbs map to `Any`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            _ => Self::Any,
        }
    }

    /// Convert to string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Any => "*",
        }
    }

    /// Check if this method matches another
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        *self == Self::Any || *self == *other
    }
}

/// A fabricated HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: Vec<u8>,
    /// Content type
    pub content_type: String,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
            content_type: "application/json".to_string(),
        }
    }
}

impl MockResponse {
    /// Create an error response with body `{"error": message}`
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self {
            status,
            body: body.into_bytes(),
            ..Self::default()
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// Get body as string
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Headers to send, with the content type first
    #[must_use]
    pub fn header_list(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), self.content_type.clone())];
        let mut extra: Vec<_> = self
            .headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case("content-type"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        extra.sort();
        headers.extend(extra);
        headers
    }
}

/// A route answering one exact URL
#[derive(Debug, Clone)]
pub struct Route {
    /// Full request URL, also the pattern registered with `Fetch.enable`
    pub url: String,
    /// HTTP method to match; other methods continue untouched
    pub method: HttpMethod,
    /// Response to fabricate
    pub response: MockResponse,
}

impl Route {
    /// Create a new route
    #[must_use]
    pub fn new(url: impl Into<String>, method: HttpMethod, response: MockResponse) -> Self {
        Self {
            url: url.into(),
            method,
            response,
        }
    }

    /// Check if this route matches a request
    #[must_use]
    pub fn matches(&self, url: &str, method: HttpMethod) -> bool {
        self.url == url && self.method.matches(&method)
    }
}

/// What the session should do with a paused request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Answer with the fabricated response
    Fulfill(MockResponse),
    /// Let the request reach the network
    Continue,
}

/// Network interception handler
#[derive(Debug, Default)]
pub struct NetworkInterception {
    routes: Vec<Route>,
}

impl NetworkInterception {
    /// Create an empty route table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route
    pub fn route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Decide how to handle a request; the first matching route wins
    #[must_use]
    pub fn handle_request(&self, url: &str, method: HttpMethod) -> RouteDecision {
        self.routes
            .iter()
            .find(|route| route.matches(url, method))
            .map_or(RouteDecision::Continue, |route| {
                RouteDecision::Fulfill(route.response.clone())
            })
    }

    /// URLs to register with the browser (deduplicated, in route order)
    #[must_use]
    pub fn cdp_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = Vec::new();
        for route in &self.routes {
            if !patterns.contains(&route.url) {
                patterns.push(route.url.clone());
            }
        }
        patterns
    }
}
