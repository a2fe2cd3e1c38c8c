//! Page objects for the demo web application.

mod dynamic_loading;
mod file_upload;
mod login;

pub use dynamic_loading::DynamicLoadingPage;
pub use file_upload::FileUploadPage;
pub use login::LoginPage;

use crate::driver::BrowserSession;
use crate::locator::Selector;
use crate::result::{WebcheckError, WebcheckResult};
use crate::wait::{wait_for_visible, WaitOptions};

/// Wait for `selector` to show up, treating a timeout as "not there yet".
///
/// Callers follow up with a text lookup, which reports absence itself.
async fn settle(
    session: &mut dyn BrowserSession,
    selector: &Selector,
    options: WaitOptions,
) -> WebcheckResult<()> {
    match wait_for_visible(session, selector, options).await {
        Ok(()) | Err(WebcheckError::Timeout { .. }) => Ok(()),
        Err(e) => Err(e),
    }
}
