//! Web UI scenarios.

use crate::assertion::Assertion;
use crate::config::{Credentials, SuiteConfig};
use crate::driver::BrowserSession;
use crate::harness::{TestCase, TestSuite};
use crate::pages::{DynamicLoadingPage, FileUploadPage, LoginPage};
use crate::result::{WebcheckError, WebcheckResult};
use futures::future::BoxFuture;

/// Flash text expected after a successful login
pub const SECURE_AREA_MESSAGE: &str = "You logged into a secure area!";
/// Flash text expected for an unknown username
pub const INVALID_USERNAME_MESSAGE: &str = "Your username is invalid!";
/// Text revealed on the dynamic loading page
pub const HELLO_WORLD_MESSAGE: &str = "Hello World!";
/// Fixture uploaded by the file upload scenario
pub const UPLOAD_FIXTURE: &str = "fileupload.txt";

/// Credentials the site rejects
#[must_use]
pub fn invalid_credentials() -> Credentials {
    Credentials::new("invalidUsername", "invalidPassword")
}

async fn login_and_read_flash(
    session: &mut dyn BrowserSession,
    config: &SuiteConfig,
    credentials: &Credentials,
) -> WebcheckResult<String> {
    let mut page = LoginPage::new(session, config);
    page.navigate().await?;
    page.login(credentials).await?;
    page.flash_message()
        .await?
        .as_deref()
        .map(str::to_string)
        .ok_or_else(|| WebcheckError::ContentNotFound {
            what: "flash message".to_string(),
        })
}

/// Login with the configured credentials reaches the secure area
pub fn valid_login<'a>(
    session: &'a mut dyn BrowserSession,
    config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let flash = login_and_read_flash(session, config, &config.credentials).await?;
        Assertion::contains(&flash, SECURE_AREA_MESSAGE).check()
    })
}

/// Login with unknown credentials is rejected
pub fn invalid_login<'a>(
    session: &'a mut dyn BrowserSession,
    config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let flash = login_and_read_flash(session, config, &invalid_credentials()).await?;
        Assertion::contains(&flash, INVALID_USERNAME_MESSAGE).check()
    })
}

/// Clicking start eventually reveals exactly "Hello World!"
pub fn dynamic_loading<'a>(
    session: &'a mut dyn BrowserSession,
    config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let mut page = DynamicLoadingPage::new(session, config);
        page.navigate().await?;
        page.start_dynamic_loading().await?;
        page.wait_for_hello_world_message().await?;
        let message = page.hello_world_message().await?;
        Assertion::equals(HELLO_WORLD_MESSAGE, message.as_str()).check()
    })
}

/// Uploading the fixture echoes its name back
pub fn file_upload<'a>(
    session: &'a mut dyn BrowserSession,
    config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let fixture = config.fixture_dir.join(UPLOAD_FIXTURE);
        let mut page = FileUploadPage::new(session, config);
        page.navigate().await?;
        page.upload_file(&fixture).await?;
        let uploaded = page.verify_file_uploaded().await?;
        Assertion::contains(&uploaded, UPLOAD_FIXTURE).check()
    })
}

/// All web UI cases
#[must_use]
pub fn ui_suite() -> TestSuite {
    let mut suite = TestSuite::new("ui");
    suite.add_test(TestCase::ui(
        "Validate successful login with valid credentials",
        valid_login,
    ));
    suite.add_test(TestCase::ui(
        "Validate error message with invalid credentials",
        invalid_login,
    ));
    suite.add_test(TestCase::ui(
        "Validate dynamic loading functionality",
        dynamic_loading,
    ));
    suite.add_test(TestCase::ui(
        "Validate file upload functionality",
        file_upload,
    ));
    suite
}
