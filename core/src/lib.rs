//! # Postboard Core
//!
//! Core traits and types for the Postboard state-synchronization layer.
//!
//! This crate provides the fundamental abstractions for keeping a local,
//! normalized copy of remote REST resources using the Reducer pattern.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature (a collection plus request status)
//! - **Action**: All possible inputs to a reducer (requests, completions, local edits)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits (`Clock`, `HttpClient`)
//!
//! ## Example
//!
//! ```ignore
//! use postboard_core::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct NotesState {
//!     notes: Vec<String>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum NotesAction {
//!     Load,
//!     Loaded { notes: Vec<String> },
//! }
//!
//! impl Reducer for NotesReducer {
//!     type State = NotesState;
//!     type Action = NotesAction;
//!     type Environment = NotesEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut NotesState,
//!         action: NotesAction,
//!         env: &NotesEnvironment,
//!     ) -> SmallVec<[Effect<NotesAction>; 4]> {
//!         match action {
//!             NotesAction::Load => smallvec![http_effect! { /* ... */ }],
//!             NotesAction::Loaded { notes } => {
//!                 state.notes.extend(notes);
//!                 SmallVec::new()
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for building effects
pub mod effect_macros;

/// HTTP adapter contract used by HTTP effects
pub mod http;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for PostsReducer {
    ///     type State = PostsState;
    ///     type Action = PostsAction;
    ///     type Environment = BlogEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut PostsState,
    ///         action: PostsAction,
    ///         env: &BlogEnvironment,
    ///     ) -> SmallVec<[Effect<PostsAction>; 4]> {
    ///         match action {
    ///             PostsAction::ReactionAdded { id, reaction } => {
    ///                 state.add_reaction(id, reaction);
    ///                 SmallVec::new()
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime. Most actions produce zero or
        /// one effect, so the inline capacity avoids heap allocation.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use crate::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::time::Duration;

    /// Callback invoked with the HTTP response
    pub type OnResponse<Action> = Box<dyn FnOnce(HttpResponse) -> Option<Action> + Send>;

    /// Callback invoked with the transport fault
    pub type OnHttpError<Action> = Box<dyn FnOnce(HttpError) -> Option<Action> + Send>;

    /// An HTTP call described as data.
    ///
    /// The runtime executes `request` against `client` and feeds whatever the
    /// matching callback returns back into the store.
    pub struct HttpOperation<Action> {
        /// Client that performs the request
        pub client: Arc<dyn HttpClient>,
        /// Method, path and optional JSON body
        pub request: HttpRequest,
        /// Called when a response (of any status) arrives
        pub on_response: OnResponse<Action>,
        /// Called when no response could be obtained
        pub on_error: OnHttpError<Action>,
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// HTTP request through an injected [`HttpClient`]
        Http(HttpOperation<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Http(op) => f
                    .debug_struct("Effect::Http")
                    .field("method", &op.request.method)
                    .field("path", &op.request.path)
                    .finish_non_exhaustive(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Transform every action this effect can produce.
        ///
        /// Used to lift a child feature's effects into a parent action type.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: Fn(Action) -> B + Clone + Send + Sync + 'static,
            Action: 'static,
            B: 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Sequential(effects) => Effect::Sequential(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
                Effect::Http(op) => {
                    let HttpOperation {
                        client,
                        request,
                        on_response,
                        on_error,
                    } = op;
                    let f_err = f.clone();
                    Effect::Http(HttpOperation {
                        client,
                        request,
                        on_response: Box::new(move |response| on_response(response).map(f)),
                        on_error: Box::new(move |error| on_error(error).map(f_err)),
                    })
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use postboard_core::environment::{Clock, SystemClock};
    ///
    /// let before = chrono::Utc::now();
    /// let now = SystemClock.now();
    /// assert!(now >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
