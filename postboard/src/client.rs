//! Production HTTP client backed by `reqwest`

use crate::config::ApiConfig;
use postboard_core::http::{HttpClient, HttpError, HttpRequest, HttpResponse, Method};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// `reqwest` implementation of [`HttpClient`]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: String,
}

impl ReqwestHttpClient {
    /// Create a client for `base_url` with default settings
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Wrap an existing `reqwest` client
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// Create a client whose requests time out after the configured response timeout
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Transport` if the TLS backend cannot be initialized
    pub fn from_config(config: &ApiConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.response_timeout)
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// The base URL requests are resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = format!("{}{}", self.base_url, request.path);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) if status.is_success() => return Err(HttpError::Decode(e.to_string())),
                // Error pages are often plain text or HTML
                Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
            }
        };

        Ok(HttpResponse::new(status.as_u16(), body))
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + '_>> {
        Box::pin(self.send(request))
    }
}
