//! UI scenarios against the scripted demo app.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use webcheck::mock_app::demo_app_session;
use webcheck::scenarios::ui;
use webcheck::{
    screenshot_file_name, BrowserSession, Credentials, SessionProvider, SuiteConfig, TestHarness,
    WebcheckResult,
};

fn fixture_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
}

fn config(screenshots: &std::path::Path) -> SuiteConfig {
    SuiteConfig::default()
        .with_base_url("https://demo.test")
        .with_fixture_dir(fixture_dir())
        .with_screenshot_dir(screenshots)
}

#[tokio::test]
async fn test_every_ui_case_passes() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let locators = config.locators.clone();
    let accepted = config.credentials.clone();
    let open = move || -> WebcheckResult<Box<dyn BrowserSession>> {
        Ok(Box::new(demo_app_session(&locators, &accepted)))
    };
    let provider: &dyn SessionProvider = &open;

    let results = TestHarness::new()
        .run(&ui::ui_suite(), &config, Some(provider))
        .await;

    for failure in results.failures() {
        eprintln!("{}: {:?}", failure.name, failure.error);
    }
    assert!(results.all_passed());
    assert_eq!(results.total(), 4);

    for result in &results.results {
        let expected = tmp.path().join(screenshot_file_name(&result.name));
        assert_eq!(result.screenshot.as_deref(), Some(expected.as_path()));
        assert!(expected.exists(), "{}", expected.display());
    }
    assert!(tmp
        .path()
        .join("Validate_successful_login_with_valid_credentials.png")
        .exists());
}

#[tokio::test]
async fn test_rejected_login_still_writes_screenshot() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let locators = config.locators.clone();
    let open = move || -> WebcheckResult<Box<dyn BrowserSession>> {
        Ok(Box::new(demo_app_session(
            &locators,
            &Credentials::new("someone", "else"),
        )))
    };
    let provider: &dyn SessionProvider = &open;

    let suite = ui::ui_suite().filtered("successful login");
    let results = TestHarness::new().run(&suite, &config, Some(provider)).await;

    assert_eq!(results.total(), 1);
    let result = &results.results[0];
    assert!(!result.passed);
    assert!(result.error.as_deref().unwrap().contains("secure area"));
    assert!(result.screenshot.as_ref().unwrap().exists());
}

#[tokio::test]
async fn test_ui_cases_without_browser_fail_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let results = TestHarness::new().run(&ui::ui_suite(), &config, None).await;
    assert_eq!(results.failed_count(), 4);
    assert!(results.results.iter().all(|r| r.screenshot.is_none()));
}
