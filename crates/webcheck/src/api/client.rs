//! HTTP client for the `/posts` resource.
//!
//! Every call returns an [`ApiResponse`] whatever the status code; only
//! transport failures are errors. Status checks belong to the caller.

use super::post::{NewPost, PostPatch};
use crate::config::SuiteConfig;
use crate::result::WebcheckResult;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::info;

/// Content type sent with every write
pub const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Status and decoded body of one call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body; `Null` when empty, a string when not JSON
    pub body: Value,
    /// Time to last byte
    pub latency: Duration,
}

impl ApiResponse {
    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Client for a posts collection endpoint (e.g. `https://host/posts`)
#[derive(Debug, Clone)]
pub struct PostsClient {
    endpoint: String,
    client: reqwest::Client,
}

impl PostsClient {
    /// Create a client for `endpoint` with a request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> WebcheckResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(endpoint, client))
    }

    /// Create a client with a custom reqwest client
    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Build from the suite configuration
    pub fn from_config(config: &SuiteConfig) -> WebcheckResult<Self> {
        Self::new(
            config.require_api_url()?,
            Duration::from_millis(config.timeouts.http_ms),
        )
    }

    /// Collection URL
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL of a single post
    #[must_use]
    pub fn post_url(&self, id: u64) -> String {
        format!("{}/{id}", self.endpoint)
    }

    /// `GET /posts`
    pub async fn list_posts(&self) -> WebcheckResult<ApiResponse> {
        self.send(Method::GET, &self.endpoint, None::<&()>).await
    }

    /// `GET /posts/{id}`
    pub async fn get_post(&self, id: u64) -> WebcheckResult<ApiResponse> {
        self.send(Method::GET, &self.post_url(id), None::<&()>).await
    }

    /// `POST /posts`
    pub async fn create_post(&self, post: &NewPost) -> WebcheckResult<ApiResponse> {
        self.send(Method::POST, &self.endpoint, Some(post)).await
    }

    /// `PUT /posts/{id}` with a full replacement
    pub async fn update_post(&self, id: u64, post: &NewPost) -> WebcheckResult<ApiResponse> {
        self.send(Method::PUT, &self.post_url(id), Some(post)).await
    }

    /// `PATCH /posts/{id}` with only the given fields
    pub async fn patch_post(&self, id: u64, patch: &PostPatch) -> WebcheckResult<ApiResponse> {
        self.send(Method::PATCH, &self.post_url(id), Some(patch)).await
    }

    /// `DELETE /posts/{id}`
    pub async fn delete_post(&self, id: u64) -> WebcheckResult<ApiResponse> {
        self.send(Method::DELETE, &self.post_url(id), None::<&()>).await
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&T>,
    ) -> WebcheckResult<ApiResponse> {
        let start = Instant::now();
        let mut request = self.client.request(method.clone(), url);
        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, JSON_UTF8)
                .body(serde_json::to_vec(payload)?);
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        let latency = start.elapsed();
        info!(
            method = %method,
            url,
            status,
            latency_ms = latency.as_millis() as u64,
            "posts API call"
        );

        Ok(ApiResponse {
            status,
            body: decode_body(&text),
            latency,
        })
    }
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
