//! Chromium sessions over the DevTools protocol.
//!
//! Only compiled with the `browser` feature. One [`Browser`] process serves
//! many isolated [`ChromiumSession`]s, one page each.

use crate::config::BrowserSettings;
use crate::driver::{BrowserSession, ElementText, FetchResponse};
use crate::fixture::SessionProvider;
use crate::locator::Selector;
use crate::network::{HttpMethod, MockResponse, NetworkInterception, Route, RouteDecision};
use crate::result::{WebcheckError, WebcheckResult};
use async_trait::async_trait;
use base64::Engine;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FulfillRequestParams, HeaderEntry,
    RequestId, RequestPattern,
};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Browser process with a live CDP connection
#[derive(Debug)]
pub struct Browser {
    inner: Arc<tokio::sync::Mutex<CdpBrowser>>,
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch chromium with the given settings
    pub async fn launch(settings: &BrowserSettings) -> WebcheckResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(settings.viewport_width, settings.viewport_height);

        if !settings.headless {
            builder = builder.with_head();
        }

        if !settings.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = settings.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(WebcheckError::browser)?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config)
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        info!(headless = settings.headless, "browser launched");
        Ok(Self {
            inner: Arc::new(tokio::sync::Mutex::new(browser)),
            handle,
        })
    }

    /// Open a fresh page
    pub async fn new_session(&self) -> WebcheckResult<ChromiumSession> {
        let browser = self.inner.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?;
        Ok(ChromiumSession {
            page,
            interception: Arc::new(Mutex::new(NetworkInterception::new())),
            listener: None,
        })
    }

    /// Close the browser
    pub async fn close(self) -> WebcheckResult<()> {
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?;
        self.handle.abort();
        Ok(())
    }
}

#[async_trait]
impl SessionProvider for Browser {
    async fn open_session(&self) -> WebcheckResult<Box<dyn BrowserSession>> {
        Ok(Box::new(self.new_session().await?))
    }
}

/// One page driven over CDP
#[derive(Debug)]
pub struct ChromiumSession {
    page: CdpPage,
    interception: Arc<Mutex<NetworkInterception>>,
    listener: Option<tokio::task::JoinHandle<()>>,
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

impl ChromiumSession {
    async fn element(&self, selector: &Selector) -> WebcheckResult<Element> {
        let found = match selector {
            Selector::Css(s) => self.page.find_element(s.as_str()).await,
            Selector::XPath(s) => self.page.find_xpath(s.as_str()).await,
        };
        found.map_err(|_| WebcheckError::ElementNotFound {
            selector: selector.to_string(),
        })
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> WebcheckResult<T> {
        self.page
            .evaluate(expr)
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?
            .into_value()
            .map_err(|e| WebcheckError::browser(e.to_string()))
    }

    async fn enable_interception(&mut self) -> WebcheckResult<()> {
        let patterns = self
            .interception
            .lock()
            .map_err(|_| interception_error("route table poisoned"))?
            .cdp_patterns()
            .into_iter()
            .map(|p| RequestPattern::builder().url_pattern(p).build())
            .collect::<Vec<_>>();

        if self.listener.is_none() {
            let events = self
                .page
                .event_listener::<EventRequestPaused>()
                .await
                .map_err(|e| interception_error(e.to_string()))?;
            let page = self.page.clone();
            let table = Arc::clone(&self.interception);
            self.listener = Some(tokio::spawn(serve_paused_requests(page, table, events)));
        }

        self.page
            .execute(EnableParams::builder().patterns(patterns).build())
            .await
            .map_err(|e| interception_error(e.to_string()))?;
        Ok(())
    }
}

fn interception_error(message: impl Into<String>) -> WebcheckError {
    WebcheckError::Interception {
        message: message.into(),
    }
}

async fn serve_paused_requests(
    page: CdpPage,
    table: Arc<Mutex<NetworkInterception>>,
    mut events: chromiumoxide::listeners::EventStream<EventRequestPaused>,
) {
    while let Some(event) = events.next().await {
        let method = HttpMethod::parse(&event.request.method);
        let decision = match table.lock() {
            Ok(net) => net.handle_request(&event.request.url, method),
            Err(_) => RouteDecision::Continue,
        };
        let outcome = match decision {
            RouteDecision::Fulfill(resp) => fulfill(&page, event.request_id.clone(), &resp).await,
            RouteDecision::Continue => page
                .execute(ContinueRequestParams::new(event.request_id.clone()))
                .await
                .map(|_| ())
                .map_err(|e| interception_error(e.to_string())),
        };
        match outcome {
            Ok(()) => debug!(url = %event.request.url, method = method.as_str(), "request handled"),
            Err(e) => warn!(url = %event.request.url, error = %e, "interception failed"),
        }
    }
}

async fn fulfill(page: &CdpPage, request_id: RequestId, resp: &MockResponse) -> WebcheckResult<()> {
    let headers = resp
        .header_list()
        .into_iter()
        .map(|(name, value)| HeaderEntry::new(name, value))
        .collect::<Vec<_>>();
    let params = FulfillRequestParams::builder()
        .request_id(request_id)
        .response_code(i64::from(resp.status))
        .response_headers(headers)
        .body(base64::engine::general_purpose::STANDARD.encode(&resp.body))
        .build()
        .map_err(interception_error)?;
    page.execute(params)
        .await
        .map_err(|e| interception_error(e.to_string()))?;
    Ok(())
}

#[derive(serde::Deserialize)]
struct TextLookup {
    text: Option<String>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn goto(&mut self, url: &str) -> WebcheckResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| WebcheckError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn fill(&mut self, selector: &Selector, value: &str) -> WebcheckResult<()> {
        let element = self.element(selector).await?;
        // type_str sends key events to whatever holds focus
        element
            .focus()
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?;
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?;
        element
            .type_str(value)
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?;
        Ok(())
    }

    async fn click(&mut self, selector: &Selector) -> WebcheckResult<()> {
        self.element(selector)
            .await?
            .click()
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?;
        Ok(())
    }

    async fn set_input_files(
        &mut self,
        selector: &Selector,
        files: &[PathBuf],
    ) -> WebcheckResult<()> {
        let element = self.element(selector).await?;
        let files = files
            .iter()
            .map(|f| std::fs::canonicalize(f).map(|p| p.to_string_lossy().into_owned()))
            .collect::<Result<Vec<_>, _>>()?;
        let params = SetFileInputFilesParams::builder()
            .files(files)
            .backend_node_id(element.backend_node_id)
            .build()
            .map_err(WebcheckError::browser)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?;
        Ok(())
    }

    async fn text_content(&mut self, selector: &Selector) -> WebcheckResult<ElementText> {
        let lookup: TextLookup = self
            .eval(format!("({{ text: {} }})", selector.to_text_query()))
            .await?;
        Ok(lookup.text.into())
    }

    async fn is_visible(&mut self, selector: &Selector) -> WebcheckResult<bool> {
        self.eval(selector.to_visibility_query()).await
    }

    async fn screenshot(&mut self) -> WebcheckResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let shot = self
            .page
            .execute(params)
            .await
            .map_err(|e| WebcheckError::Screenshot {
                message: e.to_string(),
            })?;
        base64::engine::general_purpose::STANDARD
            .decode(&shot.data)
            .map_err(|e| WebcheckError::Screenshot {
                message: e.to_string(),
            })
    }

    async fn route(&mut self, route: Route) -> WebcheckResult<()> {
        info!(url = %route.url, method = route.method.as_str(), "installing route");
        self.interception
            .lock()
            .map_err(|_| interception_error("route table poisoned"))?
            .route(route);
        self.enable_interception().await
    }

    async fn fetch(&mut self, url: &str, method: HttpMethod) -> WebcheckResult<FetchResponse> {
        let verb = match method {
            HttpMethod::Any => "GET",
            other => other.as_str(),
        };
        let script = format!(
            "(async () => {{ const res = await fetch({url:?}, {{ method: {verb:?} }}); \
             return {{ status: res.status, body: await res.text() }}; }})()"
        );
        self.eval(script).await
    }

    async fn current_url(&mut self) -> WebcheckResult<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))?
            .unwrap_or_default())
    }

    async fn close(&mut self) -> WebcheckResult<()> {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| WebcheckError::browser(e.to_string()))
    }
}
