//! Suite configuration.
//!
//! [`Settings`] is a flat key→value map loaded once at startup from a flat
//! TOML file and immutable afterwards. Components receive it as
//! `Arc<Settings>` through their constructors; there is no global lookup.
//!
//! A missing file is not an error: every documented key has a hardcoded
//! default covering the public storefront deployment.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::result::{ComprarError, ComprarResult};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "comprar.toml";

/// Documented keys and their built-in defaults.
const DEFAULTS: &[(&str, &str)] = &[
    ("base_url", "https://www.saucedemo.com/v1/"),
    ("browser", "chromium"),
    ("headless", "false"),
    ("implicit_wait_secs", "10"),
    ("explicit_wait_secs", "20"),
    ("page_load_timeout_secs", "30"),
    ("standard_user", "standard_user"),
    ("locked_out_user", "locked_out_user"),
    ("problem_user", "problem_user"),
    ("performance_glitch_user", "performance_glitch_user"),
    ("password", "secret_sauce"),
    ("screenshot_on_failure", "true"),
    ("screenshot_dir", "screenshots"),
    ("report_dir", "reports"),
    ("report_title", "Storefront Automation Report"),
    ("parallel_scenarios", "3"),
];

/// Immutable, flat suite settings.
#[derive(Debug, Clone)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            values: DEFAULTS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

impl Settings {
    /// Settings with every key at its built-in default.
    #[must_use]
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Load settings from a flat TOML file, overlaying the defaults.
    ///
    /// A missing file yields the defaults. Nested tables and arrays are
    /// ignored with a warning; the settings contract is flat.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::Config`] if the file exists but is not
    /// valid TOML.
    pub fn load(path: impl AsRef<Path>) -> ComprarResult<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::defaults());
            }
            Err(e) => return Err(e.into()),
        };

        let table: toml::Table = text.parse().map_err(|e: toml::de::Error| {
            ComprarError::Config {
                message: format!("{}: {e}", path.display()),
            }
        })?;

        let mut settings = Self::defaults();
        for (key, value) in table {
            match value {
                toml::Value::String(s) => {
                    let _ = settings.values.insert(key, s);
                }
                toml::Value::Integer(i) => {
                    let _ = settings.values.insert(key, i.to_string());
                }
                toml::Value::Float(x) => {
                    let _ = settings.values.insert(key, x.to_string());
                }
                toml::Value::Boolean(b) => {
                    let _ = settings.values.insert(key, b.to_string());
                }
                other => {
                    tracing::warn!(key = %key, kind = other.type_str(), "ignoring non-flat config value");
                }
            }
        }
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(settings)
    }

    /// Override a single key. Intended for CLI flags applied before the
    /// settings are shared; settings are immutable once published.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let _ = self.values.insert(key.into(), value.into());
    }

    /// String value for a key, or `default` if absent.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).map_or(default, String::as_str)
    }

    /// Integer value for a key, or `default` if absent or unparsable.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Boolean value for a key, or `default` if absent or unparsable.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    // Convenience accessors for commonly used keys

    /// Application base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.get_str("base_url", "https://www.saucedemo.com/v1/")
    }

    /// Configured browser kind string
    #[must_use]
    pub fn browser(&self) -> &str {
        self.get_str("browser", "chromium")
    }

    /// Whether to run the browser headless
    #[must_use]
    pub fn headless(&self) -> bool {
        self.get_bool("headless", false)
    }

    /// Default timeout for explicit waits
    #[must_use]
    pub fn explicit_wait(&self) -> Duration {
        Duration::from_secs(self.get_int("explicit_wait_secs", 20).max(0) as u64)
    }

    /// Timeout for the document-ready wait
    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.get_int("page_load_timeout_secs", 30).max(0) as u64)
    }

    /// Username for the standard test account
    #[must_use]
    pub fn standard_user(&self) -> &str {
        self.get_str("standard_user", "standard_user")
    }

    /// Username for the locked-out test account
    #[must_use]
    pub fn locked_out_user(&self) -> &str {
        self.get_str("locked_out_user", "locked_out_user")
    }

    /// Username for the problem test account
    #[must_use]
    pub fn problem_user(&self) -> &str {
        self.get_str("problem_user", "problem_user")
    }

    /// Username for the performance-glitch test account
    #[must_use]
    pub fn performance_glitch_user(&self) -> &str {
        self.get_str("performance_glitch_user", "performance_glitch_user")
    }

    /// Shared password for the test accounts
    #[must_use]
    pub fn password(&self) -> &str {
        self.get_str("password", "secret_sauce")
    }

    /// Whether to capture screenshots on failure
    #[must_use]
    pub fn screenshot_on_failure(&self) -> bool {
        self.get_bool("screenshot_on_failure", true)
    }

    /// Directory for failure screenshots
    #[must_use]
    pub fn screenshot_dir(&self) -> &str {
        self.get_str("screenshot_dir", "screenshots")
    }

    /// Directory for run reports
    #[must_use]
    pub fn report_dir(&self) -> &str {
        self.get_str("report_dir", "reports")
    }

    /// Title for the HTML report
    #[must_use]
    pub fn report_title(&self) -> &str {
        self.get_str("report_title", "Storefront Automation Report")
    }

    /// Number of scenarios run concurrently
    #[must_use]
    pub fn parallel_scenarios(&self) -> usize {
        self.get_int("parallel_scenarios", 3).max(1) as usize
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_defaults_cover_documented_keys() {
            let settings = Settings::defaults();
            assert_eq!(settings.base_url(), "https://www.saucedemo.com/v1/");
            assert_eq!(settings.browser(), "chromium");
            assert!(!settings.headless());
            assert_eq!(settings.explicit_wait(), Duration::from_secs(20));
            assert_eq!(settings.page_load_timeout(), Duration::from_secs(30));
            assert_eq!(settings.standard_user(), "standard_user");
            assert_eq!(settings.password(), "secret_sauce");
            assert!(settings.screenshot_on_failure());
            assert_eq!(settings.screenshot_dir(), "screenshots");
            assert_eq!(settings.parallel_scenarios(), 3);
        }

        #[test]
        fn test_missing_file_falls_back_to_defaults() {
            let settings = Settings::load("definitely/not/a/real/path.toml").unwrap();
            assert_eq!(settings.base_url(), "https://www.saucedemo.com/v1/");
        }
    }

    mod typed_accessor_tests {
        use super::*;

        #[test]
        fn test_get_int_falls_back_on_garbage() {
            let mut settings = Settings::defaults();
            settings.set("explicit_wait_secs", "not a number");
            assert_eq!(settings.get_int("explicit_wait_secs", 7), 7);
        }

        #[test]
        fn test_get_bool_parses() {
            let mut settings = Settings::defaults();
            settings.set("headless", "true");
            assert!(settings.headless());
        }

        #[test]
        fn test_get_str_unknown_key_uses_default() {
            let settings = Settings::defaults();
            assert_eq!(settings.get_str("no_such_key", "fallback"), "fallback");
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_load_overlays_defaults() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(
                file,
                "base_url = \"http://localhost:8080/\"\nheadless = true\nexplicit_wait_secs = 5"
            )
            .unwrap();

            let settings = Settings::load(file.path()).unwrap();
            assert_eq!(settings.base_url(), "http://localhost:8080/");
            assert!(settings.headless());
            assert_eq!(settings.explicit_wait(), Duration::from_secs(5));
            // Untouched keys keep their defaults
            assert_eq!(settings.password(), "secret_sauce");
        }

        #[test]
        fn test_load_rejects_invalid_toml() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "this is not == toml").unwrap();
            assert!(Settings::load(file.path()).is_err());
        }

        #[test]
        fn test_load_ignores_nested_tables() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "browser = \"edge\"\n[nested]\nkey = 1").unwrap();
            let settings = Settings::load(file.path()).unwrap();
            assert_eq!(settings.browser(), "edge");
        }
    }
}
