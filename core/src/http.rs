//! HTTP adapter contract.
//!
//! The store never talks to the network directly. Reducers describe a call as
//! an [`HttpRequest`] inside an [`Effect::Http`](crate::effect::Effect::Http),
//! and the runtime hands it to whatever [`HttpClient`] the environment carries.
//!
//! The contract is deliberately thin: given a method, a path and an optional
//! JSON body, a client returns the status code and the parsed JSON body, or a
//! transport/decode fault. Interpreting status codes is the caller's job.
//!
//! # Implementations
//!
//! - `ReqwestHttpClient` (in the `postboard` crate): production client
//! - `MockHttpClient` (in `postboard-testing`): scripted replies for tests

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// HTTP verbs used against REST resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Read a resource
    Get,
    /// Create a resource
    Post,
    /// Replace a resource
    Put,
    /// Remove a resource
    Delete,
}

impl Method {
    /// Upper-case wire name of the verb
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the client's base URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// HTTP verb
    pub method: Method,
    /// Path beginning with `/`, e.g. `/posts/5`
    pub path: String,
    /// Optional JSON body
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// `GET {path}`
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// `POST {path}` with a JSON body
    #[must_use]
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    /// `PUT {path}` with a JSON body
    #[must_use]
    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }

    /// `DELETE {path}`
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// A response with its status code and parsed JSON body.
///
/// Bodies that are empty become `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Create a response
    #[must_use]
    pub const fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx range
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Deserialize the body into `T`
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        T::deserialize(&self.body).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

/// Faults raised before a usable response exists
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be parsed
    #[error("Decode error: {0}")]
    Decode(String),
}

/// HTTP client abstraction injected through the environment.
///
/// # Dyn Compatibility
///
/// Uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn` so the
/// client can live behind `Arc<dyn HttpClient>` inside effects.
pub trait HttpClient: Send + Sync {
    /// Execute a request.
    ///
    /// Any response that arrives is `Ok`, whatever its status.
    ///
    /// # Errors
    ///
    /// - `Transport`: no response was received
    /// - `Decode`: a success response carried a body that is not JSON
    fn execute(
        &self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + '_>>;
}
