//! Selectors and the per-page locator maps.
//!
//! A [`Selector`] is either CSS or XPath. Each page object owns one locator
//! map whose defaults mirror the markup of the demo application; every field
//! can be overridden from the `locators` section of the configuration file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    /// CSS selector (e.g., "#flash")
    Css(String),
    /// XPath selector (e.g., `//input[@id="username"]`)
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Classify a raw selector string.
    ///
    /// Expressions starting with `/` or `(` are XPath, everything else is CSS.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with('/') || trimmed.starts_with('(') {
            Self::XPath(trimmed.to_string())
        } else {
            Self::Css(trimmed.to_string())
        }
    }

    /// The raw expression
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }

    /// Whether this is an XPath selector
    #[must_use]
    pub const fn is_xpath(&self) -> bool {
        matches!(self, Self::XPath(_))
    }

    /// Convert to a JavaScript expression yielding the first match or `null`
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue")
            }
        }
    }

    /// JavaScript yielding the element's `textContent`, or `null` when absent
    #[must_use]
    pub fn to_text_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; return el ? el.textContent : null; }})()",
            self.to_query()
        )
    }

    /// JavaScript yielding whether the element exists and is rendered visibly
    #[must_use]
    pub fn to_visibility_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; \
             const style = window.getComputedStyle(el); \
             const rect = el.getBoundingClientRect(); \
             return style.visibility !== 'hidden' && style.display !== 'none' \
             && rect.width > 0 && rect.height > 0; }})()",
            self.to_query()
        )
    }
}

impl From<String> for Selector {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Selector {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        match selector {
            Selector::Css(s) | Selector::XPath(s) => s,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locators for the `/login` page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginLocators {
    /// Username text field
    pub username_input: Selector,
    /// Password text field
    pub password_input: Selector,
    /// Submit button
    pub login_button: Selector,
    /// Flash notification region
    pub flash_message: Selector,
}

impl Default for LoginLocators {
    fn default() -> Self {
        Self {
            username_input: Selector::xpath(r#"//input[@id="username"]"#),
            password_input: Selector::xpath(r#"//input[@id="password"]"#),
            login_button: Selector::css(".fa.fa-2x.fa-sign-in"),
            flash_message: Selector::css("#flash"),
        }
    }
}

/// Locators for the `/dynamic_loading/1` page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicLoadingLocators {
    /// Button that starts loading
    pub start_button: Selector,
    /// Heading revealed when loading finishes
    pub hello_world_message: Selector,
}

impl Default for DynamicLoadingLocators {
    fn default() -> Self {
        Self {
            start_button: Selector::css(r#"div[id="start"] button"#),
            hello_world_message: Selector::css(r#"div[id="finish"] h4"#),
        }
    }
}

/// Locators for the `/upload` page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUploadLocators {
    /// File input control
    pub choose_file: Selector,
    /// Upload submit button
    pub upload_button: Selector,
    /// Region echoing the uploaded file name
    pub uploaded_file_name: Selector,
}

impl Default for FileUploadLocators {
    fn default() -> Self {
        Self {
            choose_file: Selector::css("#file-upload"),
            upload_button: Selector::css("#file-submit"),
            uploaded_file_name: Selector::css("#uploaded-files"),
        }
    }
}

/// All locator maps, as loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Login page locators
    pub login: LoginLocators,
    /// Dynamic loading page locators
    pub dynamic_loading: DynamicLoadingLocators,
    /// File upload page locators
    pub file_upload: FileUploadLocators,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_parse_css() {
            assert_eq!(Selector::parse("#flash"), Selector::css("#flash"));
            assert_eq!(
                Selector::parse(".fa.fa-2x.fa-sign-in"),
                Selector::css(".fa.fa-2x.fa-sign-in")
            );
        }

        #[test]
        fn test_parse_xpath() {
            let sel = Selector::parse(r#"//input[@id="username"]"#);
            assert!(sel.is_xpath());
            assert!(Selector::parse("(//h4)[1]").is_xpath());
        }

        #[test]
        fn test_parse_trims_whitespace() {
            assert_eq!(Selector::parse("  #flash "), Selector::css("#flash"));
        }

        #[test]
        fn test_css_query() {
            let q = Selector::css("#flash").to_query();
            assert_eq!(q, r##"document.querySelector("#flash")"##);
        }

        #[test]
        fn test_xpath_query_escapes_quotes() {
            let q = Selector::xpath(r#"//input[@id="username"]"#).to_query();
            assert!(q.starts_with("document.evaluate("));
            assert!(q.contains(r#"\"username\""#));
            assert!(q.ends_with(".singleNodeValue"));
        }

        #[test]
        fn test_text_query_handles_absent_element() {
            let q = Selector::css("#uploaded-files").to_text_query();
            assert!(q.contains("el ? el.textContent : null"));
        }

        #[test]
        fn test_visibility_query_checks_display() {
            let q = Selector::css(r#"div[id="finish"] h4"#).to_visibility_query();
            assert!(q.contains("display !== 'none'"));
            assert!(q.contains("if (!el) return false"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("#file-submit").to_string(), "#file-submit");
        }
    }

    mod locator_map_tests {
        use super::*;

        #[test]
        fn test_login_defaults() {
            let locators = LoginLocators::default();
            assert!(locators.username_input.is_xpath());
            assert!(locators.password_input.is_xpath());
            assert_eq!(locators.flash_message.as_str(), "#flash");
        }

        #[test]
        fn test_yaml_partial_override_keeps_other_defaults() {
            let yaml = "login:\n  flash_message: \"div.flash\"\n";
            let config: LocatorConfig = serde_yaml_ng::from_str(yaml).unwrap();
            assert_eq!(config.login.flash_message, Selector::css("div.flash"));
            assert_eq!(
                config.login.login_button,
                LoginLocators::default().login_button
            );
            assert_eq!(config.file_upload, FileUploadLocators::default());
        }

        #[test]
        fn test_yaml_xpath_override_is_classified() {
            let yaml = "dynamic_loading:\n  hello_world_message: \"//div[@id='finish']/h4\"\n";
            let config: LocatorConfig = serde_yaml_ng::from_str(yaml).unwrap();
            assert!(config.dynamic_loading.hello_world_message.is_xpath());
        }

        #[test]
        fn test_serializes_as_plain_strings() {
            let json = serde_json::to_value(FileUploadLocators::default()).unwrap();
            assert_eq!(json["choose_file"], "#file-upload");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_string_round_trip(raw in "[#.a-z0-9\\[\\]=\"/@ -]{1,40}") {
                let sel = Selector::parse(&raw);
                let back: String = sel.clone().into();
                prop_assert_eq!(Selector::parse(&back), sel);
            }

            #[test]
            fn prop_leading_slash_is_xpath(tail in "[a-z\\[\\]@=\"]{0,20}") {
                let raw = format!("/{tail}");
                prop_assert!(Selector::parse(&raw).is_xpath());
            }
        }
    }
}
