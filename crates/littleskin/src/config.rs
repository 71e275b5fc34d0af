//! Configuration: account credentials, static request headers, and the
//! settings driving the check-in flow.
//!
//! Everything is loaded once up front and passed down explicitly; there is
//! no global mutable state.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use crate::error::CheckinError;
use crate::retry::RetryPolicy;

/// Environment variable holding the account credentials as JSON:
/// `{"handle": "...", "password": "..."}`.
pub const USER_INFO_ENV: &str = "USER_INFO";

/// Account identity for the login form.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub handle: String,
    pub password: String,
}

impl Credentials {
    /// Load credentials from the [`USER_INFO_ENV`] environment variable.
    pub fn from_env() -> Result<Self, CheckinError> {
        let raw = std::env::var(USER_INFO_ENV).map_err(|_| {
            CheckinError::Config(format!("{USER_INFO_ENV} environment variable not set"))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| CheckinError::Config(format!("invalid JSON in {USER_INFO_ENV}: {e}")))
    }
}

/// Load the static request headers from a JSON object file (`headers.json`).
pub fn load_headers(path: &Path) -> Result<HashMap<String, String>, CheckinError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CheckinError::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| CheckinError::Config(format!("invalid JSON in {}: {e}", path.display())))
}

/// Convert loaded headers into a [`HeaderMap`], skipping entries that are not
/// valid HTTP header names or values.
pub fn header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        match HeaderName::from_str(name) {
            Ok(name) => match HeaderValue::from_str(value) {
                Ok(value) => {
                    map.insert(name, value);
                }
                Err(e) => {
                    debug!(error = %e, header = %name, "Invalid header value; skipping");
                }
            },
            Err(e) => {
                debug!(error = %e, header = %name, "Invalid header name; skipping");
            }
        }
    }
    map
}

/// Settings for one check-in run.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Site root, always with a trailing slash.
    pub base_url: String,
    /// Pause between fetching a page and submitting the follow-up request,
    /// to pace the flow like a human would.
    pub fetch_pace: Duration,
    /// Pause between the login flow and the sign flow.
    pub flow_pace: Duration,
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed wait between failed attempts.
    pub retry_delay: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            base_url: "https://littleskin.cn/".to_string(),
            fetch_pace: Duration::from_millis(500),
            flow_pace: Duration::from_millis(200),
            max_attempts: 3,
            retry_delay: Duration::from_secs(10),
        }
    }
}

impl FlowConfig {
    /// Replace the site root, normalizing it to end with a slash so that
    /// [`FlowConfig::url_for`] joins paths consistently.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        let mut base = base_url.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.base_url = base;
        self
    }

    /// Join a path onto the base URL. `"user/sign"` and `"/user/sign"` build
    /// the same URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: self.retry_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn url_for_joins_with_and_without_leading_slash() {
        let config = FlowConfig::default().with_base_url("https://littleskin.cn/");

        assert_eq!(config.url_for("user/sign"), "https://littleskin.cn/user/sign");
        assert_eq!(config.url_for("/user/sign"), "https://littleskin.cn/user/sign");
    }

    #[test]
    fn with_base_url_adds_missing_trailing_slash() {
        let config = FlowConfig::default().with_base_url("http://127.0.0.1:8080");
        assert_eq!(config.url_for("auth/login"), "http://127.0.0.1:8080/auth/login");
    }

    // Environment access is process-global, so the whole credential matrix
    // lives in one test to keep set/remove calls sequential.
    #[test]
    fn credentials_from_env() {
        unsafe { std::env::remove_var(USER_INFO_ENV) };
        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, CheckinError::Config(_)));
        assert!(err.to_string().contains("not set"));

        unsafe { std::env::set_var(USER_INFO_ENV, "{not json") };
        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, CheckinError::Config(_)));

        unsafe {
            std::env::set_var(
                USER_INFO_ENV,
                r#"{"handle": "alice@example.com", "password": "hunter2"}"#,
            )
        };
        let credentials = Credentials::from_env().unwrap();
        assert_eq!(credentials.handle, "alice@example.com");
        assert_eq!(credentials.password, "hunter2");

        unsafe { std::env::remove_var(USER_INFO_ENV) };
    }

    #[test]
    fn load_headers_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_headers(&dir.path().join("headers.json")).unwrap_err();
        assert!(matches!(err, CheckinError::Config(_)));
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn load_headers_invalid_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"User-Agent\": ").unwrap();
        let err = load_headers(file.path()).unwrap_err();
        assert!(matches!(err, CheckinError::Config(_)));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn load_headers_parses_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"User-Agent": "skinsign", "Accept": "text/html"}"#)
            .unwrap();
        let headers = load_headers(file.path()).unwrap();
        assert_eq!(headers.get("User-Agent").map(String::as_str), Some("skinsign"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn header_map_skips_invalid_entries() {
        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), "skinsign".to_string());
        headers.insert("Bad Name".to_string(), "x".to_string());
        headers.insert("X-Broken".to_string(), "line\nbreak".to_string());

        let map = header_map(&headers);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("user-agent").unwrap(), "skinsign");
    }
}
