//! Application composition: posts and users slices under one store.

use crate::environment::BlogEnvironment;
use crate::posts::{PostsAction, PostsReducer, PostsState};
use crate::types::RequestId;
use crate::users::{UsersAction, UsersReducer, UsersState};
use postboard_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use postboard_core::{SmallVec, effect::Effect, reducer::Reducer};
use serde::{Deserialize, Serialize};

/// Whole-application state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogState {
    /// Posts slice
    pub posts: PostsState,
    /// Users slice
    pub users: UsersState,
}

/// Whole-application action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlogAction {
    /// Routed to the posts slice
    Posts(PostsAction),
    /// Routed to the users slice
    Users(UsersAction),
}

impl BlogAction {
    /// Request id if this is a completion action
    #[must_use]
    pub const fn completes(&self) -> Option<RequestId> {
        match self {
            Self::Posts(action) => action.completes(),
            Self::Users(action) => action.completes(),
        }
    }
}

impl From<PostsAction> for BlogAction {
    fn from(action: PostsAction) -> Self {
        Self::Posts(action)
    }
}

impl From<UsersAction> for BlogAction {
    fn from(action: UsersAction) -> Self {
        Self::Users(action)
    }
}

/// Root reducer: each slice reducer scoped to its part of [`BlogState`]
pub struct BlogReducer {
    inner: CombinedReducer<BlogState, BlogAction, BlogEnvironment>,
}

impl BlogReducer {
    /// Creates a new `BlogReducer`
    #[must_use]
    pub fn new() -> Self {
        let posts = scope_reducer(
            PostsReducer::new(),
            |state: &mut BlogState| &mut state.posts,
            |action| match action {
                BlogAction::Posts(action) => Some(action),
                BlogAction::Users(_) => None,
            },
            BlogAction::Posts,
        );
        let users = scope_reducer(
            UsersReducer::new(),
            |state: &mut BlogState| &mut state.users,
            |action| match action {
                BlogAction::Users(action) => Some(action),
                BlogAction::Posts(_) => None,
            },
            BlogAction::Users,
        );

        Self {
            inner: combine_reducers(vec![Box::new(posts), Box::new(users)]),
        }
    }
}

impl Default for BlogReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for BlogReducer {
    type State = BlogState;
    type Action = BlogAction;
    type Environment = BlogEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.inner.reduce(state, action, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PostId, ReactionKind, RequestStatus, User, UserId};
    use postboard_core::http::Method;
    use postboard_testing::{MockHttpClient, ReducerTest, assertions, test_clock};
    use std::sync::Arc;

    fn env() -> BlogEnvironment {
        BlogEnvironment::new(Arc::new(MockHttpClient::new()), Arc::new(test_clock()))
    }

    #[test]
    fn posts_actions_only_touch_posts() {
        ReducerTest::new(BlogReducer::new())
            .with_env(env())
            .given_state(BlogState::default())
            .when_action(BlogAction::Posts(PostsAction::FetchPosts {
                request_id: RequestId::new(),
            }))
            .then_state(|state| {
                assert_eq!(state.posts.status, RequestStatus::Loading);
                assert_eq!(state.users.status, RequestStatus::Idle);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_http_request(effects, Method::Get, "/posts");
            })
            .run();
    }

    #[test]
    fn users_actions_only_touch_users() {
        ReducerTest::new(BlogReducer::new())
            .with_env(env())
            .given_state(BlogState::default())
            .when_action(BlogAction::Users(UsersAction::UsersFetched {
                request_id: RequestId::new(),
                result: Ok(vec![User {
                    id: UserId(1),
                    name: "Ann".into(),
                }]),
            }))
            .when_action(BlogAction::Posts(PostsAction::ReactionAdded {
                id: PostId(1),
                reaction: ReactionKind::Coffee,
            }))
            .then_state(|state| {
                assert_eq!(state.users.author_name(UserId(1)), "Ann");
                assert_eq!(state.posts.status, RequestStatus::Idle);
                assert!(state.posts.posts.is_empty());
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 0))
            .run();
    }

    #[test]
    fn slice_effects_are_lifted_into_blog_actions() {
        let request_id = RequestId::new();
        let mut effects = BlogReducer::new().reduce(
            &mut BlogState::default(),
            BlogAction::Users(UsersAction::FetchUsers { request_id }),
            &env(),
        );

        let Some(Effect::Http(op)) = effects.pop() else {
            panic!("expected an http effect");
        };
        let completion = (op.on_error)(postboard_core::http::HttpError::Transport("down".into()));

        assert!(matches!(
            completion,
            Some(BlogAction::Users(UsersAction::UsersFetched { result: Err(_), .. }))
        ));
        assert_eq!(completion.and_then(|a| a.completes()), Some(request_id));
    }
}
