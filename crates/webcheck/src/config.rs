//! Suite configuration.
//!
//! Values come from three layers, later layers winning:
//! built-in defaults, an optional YAML file, then environment variables.
//! Nothing here is mutated after loading; tests that need different values
//! build their own instances.

use crate::locator::LocatorConfig;
use crate::result::{WebcheckError, WebcheckResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default web UI base URL
pub const DEFAULT_BASE_URL: &str = "https://the-internet.herokuapp.com";
/// Default posts collection endpoint
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/posts";
/// Default login identifier
pub const DEFAULT_USERNAME: &str = "tomsmith";
/// Default login secret
pub const DEFAULT_PASSWORD: &str = "SuperSecretPassword!";
/// Default screenshot output directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";
/// Default directory holding upload fixtures
pub const DEFAULT_FIXTURE_DIR: &str = "fixtures";
/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "webcheck.yaml";

/// Login credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Login identifier
    pub username: String,
    /// Login secret
    #[serde(skip_serializing)]
    pub password: String,
}

impl Credentials {
    /// Create credentials from a pair of strings
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Explicit timeouts for every blocking step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Navigation timeout in milliseconds
    pub navigation_ms: u64,
    /// Element lookup and visibility wait timeout in milliseconds
    pub element_ms: u64,
    /// Polling interval for waits in milliseconds
    pub poll_interval_ms: u64,
    /// HTTP request timeout in milliseconds
    pub http_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 30_000,
            element_ms: 5_000,
            poll_interval_ms: 50,
            http_ms: 30_000,
        }
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run in headless mode
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            viewport_width: 1280,
            viewport_height: 720,
            sandbox: true,
        }
    }
}

/// Complete suite configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Web UI base URL
    pub base_url: String,
    /// Posts collection endpoint
    pub api_url: String,
    /// Credentials used by the valid-login scenario
    pub credentials: Credentials,
    /// Where per-test screenshots are written
    pub screenshot_dir: PathBuf,
    /// Where upload fixtures are read from
    pub fixture_dir: PathBuf,
    /// Browser launch settings
    pub browser: BrowserSettings,
    /// Timeouts
    pub timeouts: Timeouts,
    /// Per-page locator maps
    pub locators: LocatorConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            credentials: Credentials::default(),
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
            browser: BrowserSettings::default(),
            timeouts: Timeouts::default(),
            locators: LocatorConfig::default(),
        }
    }
}

impl SuiteConfig {
    /// Create a configuration with built-in defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration: file (explicit path, or `webcheck.yaml` if present), then env.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path cannot be read or any file fails to parse.
    pub fn load(path: Option<&Path>) -> WebcheckResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &Path) -> WebcheckResult<Self> {
        debug!(path = %path.display(), "loading configuration file");
        let raw = std::fs::read_to_string(path).map_err(|e| WebcheckError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parse YAML text; missing keys keep their defaults
    pub fn from_yaml_str(raw: &str) -> WebcheckResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(raw)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        override_string(&mut self.base_url, "BASE_URL", &lookup);
        override_string(&mut self.api_url, "API_URL", &lookup);
        override_string(&mut self.credentials.username, "USERNAME", &lookup);
        override_string(&mut self.credentials.password, "PASSWORD", &lookup);
        override_path(&mut self.screenshot_dir, "SCREENSHOT_DIR", &lookup);
        override_path(&mut self.fixture_dir, "FIXTURE_DIR", &lookup);
        override_bool(&mut self.browser.headless, "HEADLESS", &lookup);
        if let Some(path) = lookup("CHROMIUM_PATH").filter(|v| !v.is_empty()) {
            self.browser.chromium_path = Some(path);
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the posts endpoint
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set the fixture directory
    #[must_use]
    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = dir.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.browser.headless = headless;
        self
    }

    /// Set timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Base URL, or `MissingConfig` if empty
    pub fn require_base_url(&self) -> WebcheckResult<&str> {
        require("BASE_URL", &self.base_url)
    }

    /// Posts endpoint without trailing slash, or `MissingConfig` if empty
    pub fn require_api_url(&self) -> WebcheckResult<&str> {
        require("API_URL", &self.api_url)
    }
}

fn require<'a>(key: &str, value: &'a str) -> WebcheckResult<&'a str> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(WebcheckError::MissingConfig {
            key: key.to_string(),
        });
    }
    Ok(trimmed)
}

fn override_string<F>(target: &mut String, key: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(key) {
        *target = val;
    }
}

fn override_path<F>(target: &mut PathBuf, key: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(key).filter(|v| !v.is_empty()) {
        *target = PathBuf::from(val);
    }
}

fn override_bool<F>(target: &mut bool, key: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(key) {
        match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => *target = true,
            "0" | "false" | "no" => *target = false,
            _ => warn!(
                key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::locator::Selector;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_default_credentials() {
            let creds = Credentials::default();
            assert_eq!(creds.username, "tomsmith");
            assert_eq!(creds.password, "SuperSecretPassword!");
        }

        #[test]
        fn test_default_config() {
            let config = SuiteConfig::default();
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.api_url, DEFAULT_API_URL);
            assert_eq!(config.timeouts.element_ms, 5_000);
            assert!(config.browser.headless);
        }

        #[test]
        fn test_debug_redacts_password() {
            let debug = format!("{:?}", Credentials::default());
            assert!(debug.contains("tomsmith"));
            assert!(!debug.contains("SuperSecretPassword!"));
        }
    }

    mod env_override_tests {
        use super::*;

        #[test]
        fn test_unset_env_keeps_defaults() {
            let mut config = SuiteConfig::default();
            config.apply_overrides_from(lookup_from(&[]));
            assert_eq!(config, SuiteConfig::default());
        }

        #[test]
        fn test_env_overrides_urls_and_credentials() {
            let mut config = SuiteConfig::default();
            config.apply_overrides_from(lookup_from(&[
                ("BASE_URL", "http://localhost:7080"),
                ("API_URL", "http://localhost:3000/posts"),
                ("USERNAME", "alice"),
                ("PASSWORD", "hunter2"),
            ]));
            assert_eq!(config.base_url, "http://localhost:7080");
            assert_eq!(config.api_url, "http://localhost:3000/posts");
            assert_eq!(config.credentials, Credentials::new("alice", "hunter2"));
        }

        #[test]
        fn test_headless_parsing() {
            let mut config = SuiteConfig::default();
            config.apply_overrides_from(lookup_from(&[("HEADLESS", "false")]));
            assert!(!config.browser.headless);

            config.apply_overrides_from(lookup_from(&[("HEADLESS", "maybe")]));
            assert!(!config.browser.headless, "invalid value must be ignored");
        }

        #[test]
        fn test_paths_and_chromium() {
            let mut config = SuiteConfig::default();
            config.apply_overrides_from(lookup_from(&[
                ("SCREENSHOT_DIR", "out/shots"),
                ("FIXTURE_DIR", "data"),
                ("CHROMIUM_PATH", "/usr/bin/chromium"),
            ]));
            assert_eq!(config.screenshot_dir, PathBuf::from("out/shots"));
            assert_eq!(config.fixture_dir, PathBuf::from("data"));
            assert_eq!(
                config.browser.chromium_path.as_deref(),
                Some("/usr/bin/chromium")
            );
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_empty_yaml_is_default() {
            assert_eq!(
                SuiteConfig::from_yaml_str("").unwrap(),
                SuiteConfig::default()
            );
        }

        #[test]
        fn test_partial_yaml() {
            let yaml = r##"
base_url: "http://127.0.0.1:9000"
timeouts:
  element_ms: 1500
locators:
  login:
    flash_message: "#notice"
"##;
            let config = SuiteConfig::from_yaml_str(yaml).unwrap();
            assert_eq!(config.base_url, "http://127.0.0.1:9000");
            assert_eq!(config.timeouts.element_ms, 1500);
            assert_eq!(config.timeouts.navigation_ms, 30_000);
            assert_eq!(
                config.locators.login.flash_message,
                Selector::css("#notice")
            );
            assert_eq!(config.api_url, DEFAULT_API_URL);
        }

        #[test]
        fn test_invalid_yaml_is_error() {
            let err = SuiteConfig::from_yaml_str("timeouts: [1, 2").unwrap_err();
            assert!(matches!(err, WebcheckError::Yaml(_)));
        }

        #[test]
        fn test_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("webcheck.yaml");
            std::fs::write(&path, "api_url: \"http://localhost:1/posts\"\n").unwrap();
            let config = SuiteConfig::from_file(&path).unwrap();
            assert_eq!(config.api_url, "http://localhost:1/posts");
        }

        #[test]
        fn test_from_missing_file_is_config_error() {
            let err = SuiteConfig::from_file(Path::new("/nonexistent/webcheck.yaml")).unwrap_err();
            assert!(matches!(err, WebcheckError::Config { .. }));
        }
    }

    mod require_tests {
        use super::*;

        #[test]
        fn test_require_base_url_empty() {
            let config = SuiteConfig::default().with_base_url("");
            let err = config.require_base_url().unwrap_err();
            assert!(matches!(err, WebcheckError::MissingConfig { ref key } if key == "BASE_URL"));
        }

        #[test]
        fn test_require_strips_trailing_slash() {
            let config = SuiteConfig::default().with_api_url("http://x/posts/");
            assert_eq!(config.require_api_url().unwrap(), "http://x/posts");
        }
    }
}
