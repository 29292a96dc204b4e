//! API configuration.
//!
//! Values come from the application or the environment; nothing here is read
//! lazily at request time.

use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the API base URL
pub const API_URL_VAR: &str = "POSTBOARD_API_URL";

/// Environment variable holding the completion timeout in seconds
pub const RESPONSE_TIMEOUT_VAR: &str = "POSTBOARD_RESPONSE_TIMEOUT_SECS";

/// Default REST API base URL
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Errors raised while loading configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to something unusable
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// REST API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without trailing slash (e.g., `https://api.example.com`).
    pub base_url: String,

    /// Path of the posts resource.
    ///
    /// Default: `/posts`
    pub posts_path: String,

    /// Path of the users resource.
    ///
    /// Default: `/users`
    pub users_path: String,

    /// How long a caller waits for a request's completion.
    ///
    /// Default: 10 seconds
    pub response_timeout: Duration,
}

impl ApiConfig {
    /// Create a configuration for the given base URL.
    ///
    /// A trailing `/` is stripped.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            posts_path: "/posts".to_string(),
            users_path: "/users".to_string(),
            response_timeout: Duration::from_secs(10),
        }
    }

    /// Load from `POSTBOARD_API_URL` and `POSTBOARD_RESPONSE_TIMEOUT_SECS`.
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the URL is empty or not
    /// http(s), or the timeout is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ApiConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            let url = url.trim().to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    name: API_URL_VAR,
                    value: url,
                });
            }
            config.base_url = trim_base_url(url);
        }

        if let Some(raw) = lookup(RESPONSE_TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    name: RESPONSE_TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config.response_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the posts resource path.
    #[must_use]
    pub fn with_posts_path(mut self, path: impl Into<String>) -> Self {
        self.posts_path = path.into();
        self
    }

    /// Set the users resource path.
    #[must_use]
    pub fn with_users_path(mut self, path: impl Into<String>) -> Self {
        self.users_path = path.into();
        self
    }

    /// Set the completion timeout.
    #[must_use]
    pub const fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Path of a single post, e.g. `/posts/5`
    #[must_use]
    pub fn post_path(&self, id: impl std::fmt::Display) -> String {
        format!("{}/{id}", self.posts_path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn trim_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
