//! Users slice: a read-only mirror of `/users`.

use crate::api;
use crate::environment::BlogEnvironment;
use crate::error::ApiError;
use crate::types::{RequestId, RequestStatus, User, UserId};
use postboard_core::{SmallVec, effect::Effect, http_effect, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};

/// Shown when a post's author is not among the loaded users
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// State of the users slice
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersState {
    /// Users as last fetched
    pub users: Vec<User>,
    /// Lifecycle of the last fetch
    pub status: RequestStatus,
    /// Message of the last failure, cleared on success
    pub error: Option<String>,
}

impl UsersState {
    /// All users
    #[must_use]
    pub fn all(&self) -> &[User] {
        &self.users
    }

    /// Looks up a user by id
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// The user's name, or [`UNKNOWN_AUTHOR`]
    #[must_use]
    pub fn author_name(&self, id: UserId) -> &str {
        self.get(id).map_or(UNKNOWN_AUTHOR, |user| user.name.as_str())
    }
}

/// Actions for the users slice
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsersAction {
    /// Load every user, replacing the current list
    FetchUsers {
        /// Correlation id echoed by `UsersFetched`
        request_id: RequestId,
    },

    /// `FetchUsers` finished
    UsersFetched {
        /// Id of the originating request
        request_id: RequestId,
        /// Decoded users or the failure
        result: Result<Vec<User>, ApiError>,
    },
}

impl UsersAction {
    /// Request id if this is a completion action
    #[must_use]
    pub const fn completes(&self) -> Option<RequestId> {
        match self {
            Self::UsersFetched { request_id, .. } => Some(*request_id),
            Self::FetchUsers { .. } => None,
        }
    }
}

/// Reducer for the users slice
#[derive(Clone, Debug, Default)]
pub struct UsersReducer;

impl UsersReducer {
    /// Creates a new `UsersReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for UsersReducer {
    type State = UsersState;
    type Action = UsersAction;
    type Environment = BlogEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            UsersAction::FetchUsers { request_id } => {
                state.status = RequestStatus::Loading;
                smallvec![http_effect! {
                    client: env.http,
                    request: api::fetch_users(&env.config),
                    on_response: |response| Some(UsersAction::UsersFetched {
                        request_id,
                        result: api::decode_users(&response),
                    }),
                    on_error: |error| Some(UsersAction::UsersFetched {
                        request_id,
                        result: Err(error.into()),
                    })
                }]
            },

            UsersAction::UsersFetched { request_id, result } => {
                match result {
                    Ok(users) => {
                        tracing::info!(%request_id, count = users.len(), "Fetched users");
                        state.users = users;
                        state.status = RequestStatus::Succeeded;
                        state.error = None;
                    },
                    Err(error) => {
                        tracing::warn!(%request_id, error = %error, "Fetching users failed");
                        state.status = RequestStatus::Failed;
                        state.error = Some(error.to_string());
                    },
                }
                SmallVec::new()
            },
        }
    }
}
