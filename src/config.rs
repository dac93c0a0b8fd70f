//! Runtime configuration.
//!
//! Values come from CLI flags / environment (see `cli::args`), falling back to the
//! defaults below. `validate` runs before any client is built.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 120;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub wikipedia_url: String,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    /// `None` means the OS data directory.
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            wikipedia_url: DEFAULT_WIKIPEDIA_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            store_path: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn is_http_url(s: &str) -> bool {
    let s = s.trim();
    s.starts_with("http://") || s.starts_with("https://")
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        if !is_http_url(&self.api_base_url) {
            return Err(invalid("api_base_url", "must start with http:// or https://"));
        }
        if !is_http_url(&self.wikipedia_url) {
            return Err(invalid("wikipedia_url", "must start with http:// or https://"));
        }
        if self.request_timeout.is_zero() {
            return Err(invalid("request_timeout", "must be > 0"));
        }
        if self.poll_interval.is_zero() {
            return Err(invalid("poll_interval", "must be > 0"));
        }
        if self.poll_max_attempts == 0 {
            return Err(invalid("poll_max_attempts", "must be > 0"));
        }
        if let Some(p) = &self.store_path {
            if p.as_os_str().is_empty() {
                return Err(invalid("store_path", "must not be empty"));
            }
        }
        Ok(())
    }

    /// Base URL without trailing slash.
    pub fn api_root(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }
}
