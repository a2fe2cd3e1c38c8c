//! `/dynamic_loading/1` page.

use crate::config::SuiteConfig;
use crate::driver::BrowserSession;
use crate::locator::DynamicLoadingLocators;
use crate::page_object::{goto_with_timeout, PageObject};
use crate::result::WebcheckResult;
use crate::wait::{wait_for_visible, WaitOptions};
use tracing::info;

/// Page whose message is hidden until a start button is clicked
pub struct DynamicLoadingPage<'a> {
    session: &'a mut dyn BrowserSession,
    config: &'a SuiteConfig,
    locators: DynamicLoadingLocators,
}

impl std::fmt::Debug for DynamicLoadingPage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicLoadingPage")
            .field("locators", &self.locators)
            .finish_non_exhaustive()
    }
}

impl PageObject for DynamicLoadingPage<'_> {
    fn path(&self) -> &'static str {
        "/dynamic_loading/1"
    }
}

impl<'a> DynamicLoadingPage<'a> {
    /// Bind the page to a session, using the configured locators
    pub fn new(session: &'a mut dyn BrowserSession, config: &'a SuiteConfig) -> Self {
        Self {
            session,
            config,
            locators: config.locators.dynamic_loading.clone(),
        }
    }

    /// Replace the locator map
    #[must_use]
    pub fn with_locators(mut self, locators: DynamicLoadingLocators) -> Self {
        self.locators = locators;
        self
    }

    /// Open the page
    pub async fn navigate(&mut self) -> WebcheckResult<()> {
        let url = self.url(self.config.require_base_url()?);
        goto_with_timeout(&mut *self.session, &url, self.config.timeouts.navigation_ms).await
    }

    /// Click the start button
    pub async fn start_dynamic_loading(&mut self) -> WebcheckResult<()> {
        info!("starting dynamic loading");
        self.session.click(&self.locators.start_button).await
    }

    /// Block until the message is visible or the element timeout elapses
    pub async fn wait_for_hello_world_message(&mut self) -> WebcheckResult<()> {
        wait_for_visible(
            &mut *self.session,
            &self.locators.hello_world_message,
            WaitOptions::from(&self.config.timeouts),
        )
        .await
    }

    /// Message text; absent and empty are errors
    pub async fn hello_world_message(&mut self) -> WebcheckResult<String> {
        self.session
            .text_content(&self.locators.hello_world_message)
            .await?
            .require("Hello World message")
    }
}
