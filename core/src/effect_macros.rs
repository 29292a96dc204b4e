//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants, particularly
//! HTTP calls whose callbacks turn responses into completion actions.

/// Create an `Effect::Http` operation
///
/// # Example
///
/// ```rust,ignore
/// use postboard_core::http_effect;
///
/// http_effect! {
///     client: env.http,
///     request: HttpRequest::get("/posts"),
///     on_response: |response| Some(PostsAction::PostsFetched { result: decode(response) }),
///     on_error: |error| Some(PostsAction::PostsFetched { result: Err(error.into()) })
/// }
/// ```
#[macro_export]
macro_rules! http_effect {
    (
        client: $client:expr,
        request: $request:expr,
        on_response: |$response_param:ident| $response_body:expr,
        on_error: |$error_param:ident| $error_body:expr
    ) => {
        $crate::effect::Effect::Http($crate::effect::HttpOperation {
            client: ::std::sync::Arc::clone(&$client),
            request: $request,
            on_response: ::std::boxed::Box::new(move |$response_param| $response_body),
            on_error: ::std::boxed::Box::new(move |$error_param| $error_body),
        })
    };
}

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use postboard_core::async_effect;
///
/// async_effect! {
///     let users = load_users().await;
///     Some(UsersAction::Loaded { users })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use postboard_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(30),
///     action: PostsAction::FetchPosts { request_id: RequestId::new() }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use crate::http::{HttpClient, HttpError, HttpRequest, HttpResponse, Method};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AsyncResult { value: i32 },
        TimeoutExpired,
        Status(u16),
        Failed(String),
    }

    struct OkClient;

    impl HttpClient for OkClient {
        fn execute(
            &self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + '_>> {
            Box::pin(async { Ok(HttpResponse::new(200, serde_json::Value::Null)) })
        }
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_secs(30),
            action: TestAction::TimeoutExpired
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }

    #[test]
    fn test_http_effect_macro() {
        let client: Arc<dyn HttpClient> = Arc::new(OkClient);
        let effect = http_effect! {
            client: client,
            request: HttpRequest::get("/posts"),
            on_response: |response| Some(TestAction::Status(response.status)),
            on_error: |error| Some(TestAction::Failed(error.to_string()))
        };

        let Effect::Http(op) = effect else {
            panic!("expected an http effect");
        };
        assert_eq!(op.request.method, Method::Get);
        assert_eq!(
            (op.on_response)(HttpResponse::new(204, serde_json::Value::Null)),
            Some(TestAction::Status(204))
        );
        assert_eq!(
            (op.on_error)(HttpError::Transport("refused".to_string())),
            Some(TestAction::Failed("Transport error: refused".to_string()))
        );
    }
}
