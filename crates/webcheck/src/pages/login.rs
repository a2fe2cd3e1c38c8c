//! `/login` page.

use super::settle;
use crate::config::{Credentials, SuiteConfig};
use crate::driver::{BrowserSession, ElementText};
use crate::locator::LoginLocators;
use crate::page_object::{goto_with_timeout, PageObject};
use crate::result::WebcheckResult;
use crate::wait::WaitOptions;
use tracing::info;

/// Login form page
pub struct LoginPage<'a> {
    session: &'a mut dyn BrowserSession,
    config: &'a SuiteConfig,
    locators: LoginLocators,
}

impl std::fmt::Debug for LoginPage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPage")
            .field("locators", &self.locators)
            .finish_non_exhaustive()
    }
}

impl PageObject for LoginPage<'_> {
    fn path(&self) -> &'static str {
        "/login"
    }
}

impl<'a> LoginPage<'a> {
    /// Bind the page to a session, using the configured locators
    pub fn new(session: &'a mut dyn BrowserSession, config: &'a SuiteConfig) -> Self {
        Self {
            session,
            config,
            locators: config.locators.login.clone(),
        }
    }

    /// Replace the locator map
    #[must_use]
    pub fn with_locators(mut self, locators: LoginLocators) -> Self {
        self.locators = locators;
        self
    }

    /// Open the login page
    pub async fn navigate(&mut self) -> WebcheckResult<()> {
        let url = self.url(self.config.require_base_url()?);
        goto_with_timeout(&mut *self.session, &url, self.config.timeouts.navigation_ms).await
    }

    /// Fill both fields and submit
    pub async fn login(&mut self, credentials: &Credentials) -> WebcheckResult<()> {
        info!(username = %credentials.username, "logging in");
        self.session
            .fill(&self.locators.username_input, &credentials.username)
            .await?;
        self.session
            .fill(&self.locators.password_input, &credentials.password)
            .await?;
        self.session.click(&self.locators.login_button).await
    }

    /// Text of the flash notification, once it has rendered
    pub async fn flash_message(&mut self) -> WebcheckResult<ElementText> {
        let options = WaitOptions::from(&self.config.timeouts);
        settle(&mut *self.session, &self.locators.flash_message, options).await?;
        let text = self.session.text_content(&self.locators.flash_message).await?;
        info!(found = text.is_found(), "read flash message");
        Ok(text)
    }
}
