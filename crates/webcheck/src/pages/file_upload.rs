//! `/upload` page.

use super::settle;
use crate::config::SuiteConfig;
use crate::driver::BrowserSession;
use crate::locator::FileUploadLocators;
use crate::page_object::{goto_with_timeout, PageObject};
use crate::result::{WebcheckError, WebcheckResult};
use crate::wait::WaitOptions;
use std::path::Path;
use tracing::info;

/// Message for an upload attempted without a file
pub const NO_FILE_SELECTED: &str = "No file selected to upload";

/// File upload form
pub struct FileUploadPage<'a> {
    session: &'a mut dyn BrowserSession,
    config: &'a SuiteConfig,
    locators: FileUploadLocators,
}

impl std::fmt::Debug for FileUploadPage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUploadPage")
            .field("locators", &self.locators)
            .finish_non_exhaustive()
    }
}

impl PageObject for FileUploadPage<'_> {
    fn path(&self) -> &'static str {
        "/upload"
    }
}

impl<'a> FileUploadPage<'a> {
    /// Bind the page to a session, using the configured locators
    pub fn new(session: &'a mut dyn BrowserSession, config: &'a SuiteConfig) -> Self {
        Self {
            session,
            config,
            locators: config.locators.file_upload.clone(),
        }
    }

    /// Replace the locator map
    #[must_use]
    pub fn with_locators(mut self, locators: FileUploadLocators) -> Self {
        self.locators = locators;
        self
    }

    /// Open the page
    pub async fn navigate(&mut self) -> WebcheckResult<()> {
        let url = self.url(self.config.require_base_url()?);
        goto_with_timeout(&mut *self.session, &url, self.config.timeouts.navigation_ms).await
    }

    /// Choose `file` and submit the form
    ///
    /// An empty path is rejected before the session is touched.
    pub async fn upload_file(&mut self, file: impl AsRef<Path>) -> WebcheckResult<()> {
        let file = file.as_ref();
        if file.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(WebcheckError::precondition(NO_FILE_SELECTED));
        }
        info!(file = %file.display(), "uploading file");
        self.session
            .set_input_files(&self.locators.choose_file, &[file.to_path_buf()])
            .await?;
        self.session.click(&self.locators.upload_button).await
    }

    /// Trimmed name echoed back by the page; absent and empty are errors
    pub async fn verify_file_uploaded(&mut self) -> WebcheckResult<String> {
        let options = WaitOptions::from(&self.config.timeouts);
        settle(&mut *self.session, &self.locators.uploaded_file_name, options).await?;
        let name = self
            .session
            .text_content(&self.locators.uploaded_file_name)
            .await?
            .require("uploaded file name")?;
        Ok(name.trim().to_string())
    }
}
