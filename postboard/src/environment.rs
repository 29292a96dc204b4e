//! Dependencies injected into the blog reducers

use crate::client::ReqwestHttpClient;
use crate::config::ApiConfig;
use postboard_core::environment::{Clock, SystemClock};
use postboard_core::http::{HttpClient, HttpError};
use std::sync::Arc;

/// Environment shared by the posts and users reducers
#[derive(Clone)]
pub struct BlogEnvironment {
    /// Client that executes HTTP effects
    pub http: Arc<dyn HttpClient>,
    /// Clock for local timestamps
    pub clock: Arc<dyn Clock>,
    /// Resource paths and timeouts
    pub config: ApiConfig,
}

impl BlogEnvironment {
    /// Creates a new `BlogEnvironment` with the default configuration
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            clock,
            config: ApiConfig::default(),
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Production wiring: `reqwest` client and system clock
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Transport` if the HTTP client cannot be built
    pub fn production(config: ApiConfig) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::from_config(&config)?;
        Ok(Self {
            http: Arc::new(http),
            clock: Arc::new(SystemClock),
            config,
        })
    }
}

impl std::fmt::Debug for BlogEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
