//! Scripted stand-in for the demo web application.
//!
//! Builds a [`MockSession`] whose pages behave like `/login`,
//! `/dynamic_loading/1` and `/upload`, so every UI scenario can run without
//! a browser or network.

use crate::config::Credentials;
use crate::driver::{MockDom, MockElement, MockSession};
use crate::locator::LocatorConfig;

/// Flash text shown after a successful login
pub const LOGIN_SUCCESS_FLASH: &str = "You logged into a secure area!\n×";
/// Flash text shown for an unknown username
pub const INVALID_USERNAME_FLASH: &str = "Your username is invalid!\n×";
/// Flash text shown for a wrong password
pub const INVALID_PASSWORD_FLASH: &str = "Your password is invalid!\n×";
/// Text revealed by the dynamic loading page
pub const HELLO_WORLD: &str = "Hello World!";
/// Visibility checks before the dynamic loading message appears
pub const LOADING_POLLS: u32 = 3;

/// Session emulating all three pages, accepting `accepted` as the only valid login
#[must_use]
pub fn demo_app_session(locators: &LocatorConfig, accepted: &Credentials) -> MockSession {
    let login = &locators.login;
    let dynamic = &locators.dynamic_loading;
    let upload = &locators.file_upload;

    let mut login_dom = MockDom::default();
    login_dom.insert(&login.username_input, MockElement::control());
    login_dom.insert(&login.password_input, MockElement::control());
    login_dom.insert(&login.login_button, MockElement::control());

    let mut dynamic_dom = MockDom::default();
    dynamic_dom.insert(&dynamic.start_button, MockElement::control());
    dynamic_dom.insert(&dynamic.hello_world_message, MockElement::hidden(HELLO_WORLD));

    let mut upload_dom = MockDom::default();
    upload_dom.insert(&upload.choose_file, MockElement::control());
    upload_dom.insert(&upload.upload_button, MockElement::control());

    let on_login = {
        let login = login.clone();
        let accepted = accepted.clone();
        move |dom: &mut MockDom| {
            let username = dom.value_of(&login.username_input);
            let password = dom.value_of(&login.password_input);
            let flash = if username != accepted.username {
                INVALID_USERNAME_FLASH
            } else if password != accepted.password {
                INVALID_PASSWORD_FLASH
            } else {
                LOGIN_SUCCESS_FLASH
            };
            dom.insert(&login.flash_message, MockElement::text(flash));
        }
    };

    let on_start = {
        let message = dynamic.hello_world_message.clone();
        move |dom: &mut MockDom| {
            if let Some(el) = dom.get_mut(&message) {
                el.reveal_after_polls = Some(LOADING_POLLS);
            }
        }
    };

    let on_upload = {
        let upload = upload.clone();
        move |dom: &mut MockDom| {
            let names: Vec<String> = dom
                .get(&upload.choose_file)
                .map(|el| {
                    el.files
                        .iter()
                        .filter_map(|p| p.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .collect()
                })
                .unwrap_or_default();
            if !names.is_empty() {
                dom.insert(
                    &upload.uploaded_file_name,
                    MockElement::text(format!("\n    {}\n  ", names.join("\n"))),
                );
            }
        }
    };

    MockSession::new()
        .with_page("/login", login_dom)
        .with_page("/dynamic_loading/1", dynamic_dom)
        .with_page("/upload", upload_dom)
        .on_click(&login.login_button, on_login)
        .on_click(&dynamic.start_button, on_start)
        .on_click(&upload.upload_button, on_upload)
}
