//! # Postboard Testing
//!
//! Testing utilities and helpers for the Postboard architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits (`FixedClock`, `MockHttpClient`)
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use postboard_testing::{MockHttpClient, test_clock};
//! use postboard_core::http::Method;
//!
//! #[tokio::test]
//! async fn fetch_fills_the_store() {
//!     let http = MockHttpClient::new();
//!     http.respond(Method::Get, "/posts", 200, json!([{ "id": 1, "title": "t", "body": "b", "userId": 1 }]));
//!
//!     let board = Postboard::with_environment(BlogEnvironment::new(Arc::new(http), Arc::new(test_clock())));
//!     board.fetch_posts().await.unwrap();
//!
//!     assert_eq!(board.posts().await.len(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use postboard_core::environment::Clock;

/// Scripted HTTP client
pub mod http_mocks;


/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use postboard_testing::mocks::FixedClock;
    /// use postboard_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities.
pub mod helpers {
    /// Route `tracing` output through the test harness's captured stdout.
    ///
    /// Honors `RUST_LOG`; safe to call from every test.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use http_mocks::MockHttpClient;
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
