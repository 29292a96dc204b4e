//! Scripted HTTP client for store and reducer tests
//!
//! [`MockHttpClient`] answers requests from a table of canned replies keyed by
//! method and path, and records every request it receives.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use postboard_core::http::{HttpClient, HttpError, HttpRequest, HttpResponse, Method};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Debug)]
enum MockReply {
    Respond {
        status: u16,
        body: Value,
        delay: Duration,
    },
    Fail(HttpError),
}

type Routes = HashMap<(Method, String), VecDeque<MockReply>>;

/// In-memory HTTP client with scripted replies.
///
/// Replies queued for the same route are served in order; the last one keeps
/// answering once the queue is down to it. Requests to a route with no reply
/// get a `404` with a `null` body.
///
/// # Example
///
/// ```
/// use postboard_core::http::{HttpClient, HttpRequest, Method};
/// use postboard_testing::MockHttpClient;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let client = MockHttpClient::new();
/// client.respond(Method::Get, "/posts", 200, json!([]));
///
/// let response = client.execute(HttpRequest::get("/posts")).await.unwrap();
/// assert_eq!(response.status, 200);
/// assert_eq!(client.request_count(Method::Get, "/posts"), 1);
/// # });
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockHttpClient {
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpClient {
    /// Create a client with no scripted routes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method path`
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(
            method,
            path,
            MockReply::Respond {
                status,
                body,
                delay: Duration::ZERO,
            },
        );
    }

    /// Queue a response that arrives after `delay`
    pub fn respond_delayed(&self, method: Method, path: &str, status: u16, body: Value, delay: Duration) {
        self.push(method, path, MockReply::Respond { status, body, delay });
    }

    /// Queue a transport-level failure for `method path`
    pub fn fail(&self, method: Method, path: &str, error: HttpError) {
        self.push(method, path, MockReply::Fail(error));
    }

    /// Every request received so far, in arrival order
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received for `method path`
    #[must_use]
    pub fn request_count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Forget all scripted replies and recorded requests
    pub fn clear(&self) {
        self.routes.lock().unwrap().clear();
        self.requests.lock().unwrap().clear();
    }

    fn push(&self, method: Method, path: &str, reply: MockReply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, request: &HttpRequest) -> Option<MockReply> {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.get_mut(&(request.method, request.path.clone()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl HttpClient for MockHttpClient {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + '_>> {
        let reply = self.next_reply(&request);
        self.requests.lock().unwrap().push(request);

        Box::pin(async move {
            match reply {
                Some(MockReply::Respond { status, body, delay }) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    Ok(HttpResponse::new(status, body))
                },
                Some(MockReply::Fail(error)) => Err(error),
                None => Ok(HttpResponse::new(404, Value::Null)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn unscripted_route_is_not_found() {
        let client = MockHttpClient::new();
        let response = client.execute(HttpRequest::get("/missing")).await.unwrap();
        assert_eq!(response, HttpResponse::new(404, Value::Null));
    }

    #[tokio::test]
    async fn queued_replies_are_served_in_order_and_last_one_sticks() {
        let client = MockHttpClient::new();
        client.respond(Method::Get, "/posts", 500, json!("boom"));
        client.respond(Method::Get, "/posts", 200, json!([]));

        let first = client.execute(HttpRequest::get("/posts")).await.unwrap();
        let second = client.execute(HttpRequest::get("/posts")).await.unwrap();
        let third = client.execute(HttpRequest::get("/posts")).await.unwrap();

        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(third.status, 200);
    }

    #[tokio::test]
    async fn routes_are_keyed_by_method() {
        let client = MockHttpClient::new();
        client.respond(Method::Delete, "/posts/1", 200, json!({}));

        let get = client.execute(HttpRequest::get("/posts/1")).await.unwrap();
        let delete = client.execute(HttpRequest::delete("/posts/1")).await.unwrap();

        assert_eq!(get.status, 404);
        assert_eq!(delete.status, 200);
    }

    #[tokio::test]
    async fn failures_and_request_log() {
        let client = MockHttpClient::new();
        client.fail(Method::Post, "/posts", HttpError::Transport("reset".to_string()));

        let result = client
            .execute(HttpRequest::post("/posts", json!({ "title": "t" })))
            .await;

        assert_eq!(result, Err(HttpError::Transport("reset".to_string())));
        assert_eq!(client.request_count(Method::Post, "/posts"), 1);
        assert_eq!(client.requests()[0].body, Some(json!({ "title": "t" })));

        client.clear();
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn delayed_reply_waits() {
        let client = MockHttpClient::new();
        client.respond_delayed(Method::Get, "/users", 200, json!([]), Duration::from_millis(30));

        let start = std::time::Instant::now();
        let response = client.execute(HttpRequest::get("/users")).await.unwrap();

        assert_eq!(response.status, 200);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
