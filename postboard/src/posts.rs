//! Posts slice: state, actions and reducer.
//!
//! Request actions flip `status` to `Loading` and emit an HTTP effect. The
//! matching completion action carries the decoded result and is merged into
//! the collection here. `ReactionAdded` is purely local.

use crate::api::{self, PostRecord};
use crate::environment::BlogEnvironment;
use crate::error::ApiError;
use crate::types::{
    NewPost, Post, PostId, PostUpdate, ReactionKind, Reactions, RequestId, RequestStatus, Timestamp,
};
use chrono::{DateTime, Duration, Utc};
use postboard_core::{SmallVec, effect::Effect, http_effect, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};

/// Number of body characters shown in a list excerpt
pub const EXCERPT_LEN: usize = 75;

/// State of the posts slice
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsState {
    /// Posts in insertion order; ids are unique
    pub posts: Vec<Post>,
    /// Lifecycle of the last async operation
    pub status: RequestStatus,
    /// Message of the last failure, cleared on success
    pub error: Option<String>,
}

impl PostsState {
    /// Creates an empty, idle slice
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All posts in insertion order
    #[must_use]
    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    /// Current request status
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Last recorded error
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Looks up a post by id
    #[must_use]
    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Posts newest first
    #[must_use]
    pub fn by_recency(&self) -> Vec<Post> {
        let mut posts = self.posts.clone();
        posts.sort_by(|a, b| b.timestamp.at.cmp(&a.timestamp.at));
        posts
    }

    /// Number of posts
    #[must_use]
    pub fn count(&self) -> usize {
        self.posts.len()
    }

    fn begin(&mut self) {
        self.status = RequestStatus::Loading;
    }

    fn succeed(&mut self) {
        self.status = RequestStatus::Succeeded;
        self.error = None;
    }

    fn fail(&mut self, error: &ApiError) {
        self.status = RequestStatus::Failed;
        self.error = Some(error.to_string());
    }

    /// Replace any post with the same id, then append
    fn upsert(&mut self, post: Post) {
        self.posts.retain(|existing| existing.id != post.id);
        self.posts.push(post);
    }
}

/// First [`EXCERPT_LEN`] characters of a post's body
#[must_use]
pub fn excerpt(post: &Post) -> &str {
    match post.body.char_indices().nth(EXCERPT_LEN) {
        Some((end, _)) => &post.body[..end],
        None => &post.body,
    }
}

/// Actions for the posts slice
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostsAction {
    // ========== Requests ==========
    /// Load every post from the API and append them
    FetchPosts {
        /// Correlation id echoed by `PostsFetched`
        request_id: RequestId,
    },

    /// `FetchPosts`, but only while the slice is still `Idle`
    LoadIfIdle {
        /// Correlation id echoed by `PostsFetched` if a fetch is issued
        request_id: RequestId,
    },

    /// Create a post on the server
    CreatePost {
        /// Correlation id echoed by `PostCreated`
        request_id: RequestId,
        /// Draft fields
        post: NewPost,
    },

    /// Replace a post on the server
    UpdatePost {
        /// Correlation id echoed by `PostUpdated`
        request_id: RequestId,
        /// Replacement fields
        update: PostUpdate,
    },

    /// Delete a post on the server
    DeletePost {
        /// Correlation id echoed by `PostDeleted`
        request_id: RequestId,
        /// Post to delete
        id: PostId,
    },

    // ========== Local ==========
    /// Add one to a post's reaction counter
    ReactionAdded {
        /// Target post
        id: PostId,
        /// Counter to increment
        reaction: ReactionKind,
    },

    // ========== Completions ==========
    /// `FetchPosts` finished
    PostsFetched {
        /// Id of the originating request
        request_id: RequestId,
        /// Decoded posts or the failure
        result: Result<Vec<PostRecord>, ApiError>,
    },

    /// `CreatePost` finished
    PostCreated {
        /// Id of the originating request
        request_id: RequestId,
        /// Created post as echoed by the server
        result: Result<PostRecord, ApiError>,
    },

    /// `UpdatePost` finished
    PostUpdated {
        /// Id of the originating request
        request_id: RequestId,
        /// Updated post as echoed by the server
        result: Result<PostRecord, ApiError>,
        /// Reactions sent with the update, kept if the server drops them
        requested_reactions: Reactions,
    },

    /// `DeletePost` finished
    PostDeleted {
        /// Id of the originating request
        request_id: RequestId,
        /// Deleted id or the failure
        result: Result<PostId, ApiError>,
    },
}

impl PostsAction {
    /// Request id if this is a completion action
    #[must_use]
    pub const fn completes(&self) -> Option<RequestId> {
        match self {
            Self::PostsFetched { request_id, .. }
            | Self::PostCreated { request_id, .. }
            | Self::PostUpdated { request_id, .. }
            | Self::PostDeleted { request_id, .. } => Some(*request_id),
            Self::FetchPosts { .. }
            | Self::LoadIfIdle { .. }
            | Self::CreatePost { .. }
            | Self::UpdatePost { .. }
            | Self::DeletePost { .. }
            | Self::ReactionAdded { .. } => None,
        }
    }
}

/// Reducer for the posts slice
#[derive(Clone, Debug, Default)]
pub struct PostsReducer;

impl PostsReducer {
    /// Creates a new `PostsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Fetched posts get zeroed reactions and `now - n` minute stamps, newest first
    fn apply_fetched(state: &mut PostsState, records: Vec<PostRecord>, now: DateTime<Utc>) {
        for (offset, record) in (1_i64..).zip(records) {
            let timestamp = Timestamp::synthetic(now - Duration::minutes(offset));
            state.upsert(into_post(record, timestamp, Reactions::default()));
        }
    }
}

fn into_post(record: PostRecord, timestamp: Timestamp, reactions: Reactions) -> Post {
    Post {
        id: record.id,
        user_id: record.user_id,
        title: record.title,
        body: record.body,
        timestamp,
        reactions,
    }
}

impl Reducer for PostsReducer {
    type State = PostsState;
    type Action = PostsAction;
    type Environment = BlogEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Requests ==========
            PostsAction::FetchPosts { request_id } => {
                state.begin();
                smallvec![http_effect! {
                    client: env.http,
                    request: api::fetch_posts(&env.config),
                    on_response: |response| Some(PostsAction::PostsFetched {
                        request_id,
                        result: api::decode_posts(&response),
                    }),
                    on_error: |error| Some(PostsAction::PostsFetched {
                        request_id,
                        result: Err(error.into()),
                    })
                }]
            },

            PostsAction::LoadIfIdle { request_id } => {
                if state.status != RequestStatus::Idle {
                    return SmallVec::new();
                }
                self.reduce(state, PostsAction::FetchPosts { request_id }, env)
            },

            PostsAction::CreatePost { request_id, post } => {
                state.begin();
                smallvec![http_effect! {
                    client: env.http,
                    request: api::create_post(&env.config, &post),
                    on_response: |response| Some(PostsAction::PostCreated {
                        request_id,
                        result: api::decode_post(&response),
                    }),
                    on_error: |error| Some(PostsAction::PostCreated {
                        request_id,
                        result: Err(error.into()),
                    })
                }]
            },

            PostsAction::UpdatePost { request_id, update } => {
                state.begin();
                let requested_reactions = update.reactions;
                smallvec![http_effect! {
                    client: env.http,
                    request: api::update_post(&env.config, &update),
                    on_response: |response| Some(PostsAction::PostUpdated {
                        request_id,
                        result: api::decode_post(&response),
                        requested_reactions,
                    }),
                    on_error: |error| Some(PostsAction::PostUpdated {
                        request_id,
                        result: Err(error.into()),
                        requested_reactions,
                    })
                }]
            },

            PostsAction::DeletePost { request_id, id } => {
                state.begin();
                smallvec![http_effect! {
                    client: env.http,
                    request: api::delete_post(&env.config, id),
                    on_response: |response| Some(PostsAction::PostDeleted {
                        request_id,
                        result: api::decode_delete(&response, id),
                    }),
                    on_error: |error| Some(PostsAction::PostDeleted {
                        request_id,
                        result: Err(error.into()),
                    })
                }]
            },

            // ========== Local ==========
            PostsAction::ReactionAdded { id, reaction } => {
                if let Some(post) = state.posts.iter_mut().find(|post| post.id == id) {
                    post.reactions.increment(reaction);
                } else {
                    tracing::debug!(post_id = %id, %reaction, "Reaction for unknown post ignored");
                }
                SmallVec::new()
            },

            // ========== Completions ==========
            PostsAction::PostsFetched { request_id, result } => {
                match result {
                    Ok(records) => {
                        tracing::info!(%request_id, count = records.len(), "Fetched posts");
                        Self::apply_fetched(state, records, env.clock.now());
                        state.succeed();
                    },
                    Err(error) => {
                        tracing::warn!(%request_id, error = %error, "Fetching posts failed");
                        state.fail(&error);
                    },
                }
                SmallVec::new()
            },

            PostsAction::PostCreated { request_id, result } => {
                match result {
                    Ok(record) => {
                        tracing::info!(%request_id, post_id = %record.id, "Created post");
                        let timestamp = Timestamp::client(env.clock.now());
                        state.upsert(into_post(record, timestamp, Reactions::default()));
                        state.succeed();
                    },
                    Err(error) => {
                        tracing::warn!(%request_id, error = %error, "Creating post failed");
                        state.fail(&error);
                    },
                }
                SmallVec::new()
            },

            PostsAction::PostUpdated {
                request_id,
                result,
                requested_reactions,
            } => {
                match result {
                    Ok(record) => {
                        tracing::info!(%request_id, post_id = %record.id, "Updated post");
                        let reactions = record.reactions.unwrap_or(requested_reactions);
                        let timestamp = Timestamp::client(env.clock.now());
                        state.upsert(into_post(record, timestamp, reactions));
                        state.succeed();
                    },
                    Err(error) => {
                        tracing::warn!(%request_id, error = %error, "Updating post failed");
                        state.fail(&error);
                    },
                }
                SmallVec::new()
            },

            PostsAction::PostDeleted { request_id, result } => {
                match result {
                    Ok(id) => {
                        tracing::info!(%request_id, post_id = %id, "Deleted post");
                        state.posts.retain(|post| post.id != id);
                        state.succeed();
                    },
                    Err(error) => {
                        tracing::warn!(%request_id, error = %error, "Deleting post failed");
                        state.fail(&error);
                    },
                }
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimestampOrigin, UserId};
    use postboard_core::http::{HttpResponse, Method};
    use postboard_testing::{MockHttpClient, ReducerTest, assertions, test_clock};
    use serde_json::json;
    use std::sync::Arc;

    fn env() -> BlogEnvironment {
        BlogEnvironment::new(Arc::new(MockHttpClient::new()), Arc::new(test_clock()))
    }

    fn now() -> DateTime<Utc> {
        use postboard_core::environment::Clock;
        test_clock().now()
    }

    fn record(id: u64) -> PostRecord {
        PostRecord {
            id: PostId(id),
            user_id: UserId(1),
            title: format!("Title {id}"),
            body: format!("Body {id}"),
            reactions: None,
        }
    }

    fn post(id: u64) -> Post {
        into_post(record(id), Timestamp::synthetic(now()), Reactions::default())
    }

    fn state_with(ids: &[u64]) -> PostsState {
        PostsState {
            posts: ids.iter().copied().map(post).collect(),
            status: RequestStatus::Succeeded,
            error: None,
        }
    }

    #[test]
    fn fetch_sets_loading_and_requests_posts() {
        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(PostsState::new())
            .when_action(PostsAction::FetchPosts {
                request_id: RequestId::new(),
            })
            .then_state(|state| {
                assert_eq!(state.status(), RequestStatus::Loading);
                assert!(state.all().is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_http_request(effects, Method::Get, "/posts");
            })
            .run();
    }

    #[test]
    fn load_if_idle_fetches_once() {
        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(PostsState::new())
            .when_action(PostsAction::LoadIfIdle {
                request_id: RequestId::new(),
            })
            .then_state(|state| assert_eq!(state.status(), RequestStatus::Loading))
            .then_effects(|effects| {
                assertions::assert_has_http_request(effects, Method::Get, "/posts");
            })
            .run();

        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[1]))
            .when_action(PostsAction::LoadIfIdle {
                request_id: RequestId::new(),
            })
            .then_state(|state| assert_eq!(state.status(), RequestStatus::Succeeded))
            .then_effects(|effects| assertions::assert_effects_count(effects, 0))
            .run();
    }

    #[test]
    fn fetch_effect_decodes_response_into_completion() {
        let request_id = RequestId::new();
        let mut effects = PostsReducer::new().reduce(
            &mut PostsState::new(),
            PostsAction::FetchPosts { request_id },
            &env(),
        );

        let Some(Effect::Http(op)) = effects.pop() else {
            panic!("expected an http effect");
        };
        let completion = (op.on_response)(HttpResponse::new(
            200,
            json!([{ "id": 1, "userId": 1, "title": "a", "body": "b" }]),
        ));

        assert_eq!(
            completion,
            Some(PostsAction::PostsFetched {
                request_id,
                result: Ok(vec![PostRecord {
                    id: PostId(1),
                    user_id: UserId(1),
                    title: "a".into(),
                    body: "b".into(),
                    reactions: None,
                }]),
            })
        );
    }

    #[test]
    fn fetched_posts_append_with_descending_synthetic_stamps() {
        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[1, 2]))
            .when_action(PostsAction::PostsFetched {
                request_id: RequestId::new(),
                result: Ok(vec![record(3), record(4)]),
            })
            .then_state(|state| {
                let ids: Vec<u64> = state.all().iter().map(|p| p.id.0).collect();
                assert_eq!(ids, vec![1, 2, 3, 4]);

                let third = state.get(PostId(3)).unwrap();
                let fourth = state.get(PostId(4)).unwrap();
                assert_eq!(third.timestamp.at, now() - Duration::minutes(1));
                assert_eq!(fourth.timestamp.at, now() - Duration::minutes(2));
                assert_eq!(third.timestamp.origin, TimestampOrigin::Synthetic);
                assert_eq!(state.status(), RequestStatus::Succeeded);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn fetched_reactions_are_reset() {
        let mut echoed = record(1);
        echoed.reactions = Some(Reactions {
            heart: 9,
            ..Reactions::default()
        });

        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(PostsState::new())
            .when_action(PostsAction::PostsFetched {
                request_id: RequestId::new(),
                result: Ok(vec![echoed]),
            })
            .then_state(|state| {
                assert_eq!(state.get(PostId(1)).unwrap().reactions, Reactions::default());
            })
            .run();
    }

    #[test]
    fn refetch_keeps_ids_unique() {
        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[1, 2]))
            .when_action(PostsAction::PostsFetched {
                request_id: RequestId::new(),
                result: Ok(vec![record(2), record(3)]),
            })
            .then_state(|state| {
                let ids: Vec<u64> = state.all().iter().map(|p| p.id.0).collect();
                assert_eq!(ids, vec![1, 2, 3]);
            })
            .run();
    }

    #[test]
    fn failed_fetch_keeps_posts_and_records_error() {
        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[1]))
            .when_action(PostsAction::FetchPosts {
                request_id: RequestId::new(),
            })
            .when_action(PostsAction::PostsFetched {
                request_id: RequestId::new(),
                result: Err(ApiError::Transport("connection refused".into())),
            })
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                assert_eq!(state.status(), RequestStatus::Failed);
                assert_eq!(state.error(), Some("Request failed: connection refused"));
            })
            .run();
    }

    #[test]
    fn success_clears_previous_error() {
        let mut failed = state_with(&[]);
        failed.status = RequestStatus::Failed;
        failed.error = Some("earlier".into());

        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(failed)
            .when_action(PostsAction::PostsFetched {
                request_id: RequestId::new(),
                result: Ok(vec![]),
            })
            .then_state(|state| {
                assert_eq!(state.status(), RequestStatus::Succeeded);
                assert_eq!(state.error(), None);
            })
            .run();
    }

    #[test]
    fn created_post_is_stamped_and_zeroed() {
        let mut echoed = record(101);
        echoed.reactions = Some(Reactions {
            rocket: 3,
            ..Reactions::default()
        });

        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[1]))
            .when_action(PostsAction::CreatePost {
                request_id: RequestId::new(),
                post: NewPost::new("New", "Post", UserId(2)),
            })
            .when_action(PostsAction::PostCreated {
                request_id: RequestId::new(),
                result: Ok(echoed),
            })
            .then_state(|state| {
                let created = state.get(PostId(101)).unwrap();
                assert_eq!(created.reactions, Reactions::default());
                assert_eq!(created.timestamp, Timestamp::client(now()));
                assert_eq!(state.all().last().map(|p| p.id), Some(PostId(101)));
                assert_eq!(state.status(), RequestStatus::Succeeded);
            })
            .run();
    }

    #[test]
    fn create_request_posts_draft() {
        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(PostsState::new())
            .when_action(PostsAction::CreatePost {
                request_id: RequestId::new(),
                post: NewPost::new("New", "Post", UserId(2)),
            })
            .then_state(|state| assert_eq!(state.status(), RequestStatus::Loading))
            .then_effects(|effects| {
                assertions::assert_has_http_request(effects, Method::Post, "/posts");
            })
            .run();
    }

    #[test]
    fn update_replaces_post_by_filter_and_append() {
        let mut echoed = record(1);
        echoed.title = "Edited".into();

        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[1, 2]))
            .when_action(PostsAction::PostUpdated {
                request_id: RequestId::new(),
                result: Ok(echoed),
                requested_reactions: Reactions {
                    wow: 2,
                    ..Reactions::default()
                },
            })
            .then_state(|state| {
                let ids: Vec<u64> = state.all().iter().map(|p| p.id.0).collect();
                assert_eq!(ids, vec![2, 1]);

                let edited = state.get(PostId(1)).unwrap();
                assert_eq!(edited.title, "Edited");
                assert_eq!(edited.reactions.wow, 2);
                assert_eq!(edited.timestamp.origin, TimestampOrigin::Client);
            })
            .run();
    }

    #[test]
    fn update_prefers_echoed_reactions() {
        let mut echoed = record(1);
        echoed.reactions = Some(Reactions {
            coffee: 4,
            ..Reactions::default()
        });

        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[1]))
            .when_action(PostsAction::PostUpdated {
                request_id: RequestId::new(),
                result: Ok(echoed),
                requested_reactions: Reactions::default(),
            })
            .then_state(|state| {
                assert_eq!(state.get(PostId(1)).unwrap().reactions.coffee, 4);
            })
            .run();
    }

    #[test]
    fn malformed_update_leaves_posts_unchanged() {
        let before = state_with(&[1, 2]);
        let expected = before.posts.clone();

        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(before)
            .when_action(PostsAction::PostUpdated {
                request_id: RequestId::new(),
                result: Err(ApiError::MalformedResponse("missing field `id`".into())),
                requested_reactions: Reactions::default(),
            })
            .then_state(move |state| {
                assert_eq!(state.posts, expected);
                assert_eq!(state.status(), RequestStatus::Failed);
            })
            .run();
    }

    #[test]
    fn delete_removes_only_on_success() {
        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[5, 6]))
            .when_action(PostsAction::PostDeleted {
                request_id: RequestId::new(),
                result: Err(ApiError::Status {
                    status: 500,
                    message: String::new(),
                }),
            })
            .then_state(|state| assert!(state.get(PostId(5)).is_some()))
            .run();

        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[5, 6]))
            .when_action(PostsAction::DeletePost {
                request_id: RequestId::new(),
                id: PostId(5),
            })
            .when_action(PostsAction::PostDeleted {
                request_id: RequestId::new(),
                result: Ok(PostId(5)),
            })
            .then_state(|state| {
                assert!(state.get(PostId(5)).is_none());
                assert_eq!(state.count(), 1);
            })
            .run();
    }

    #[test]
    fn reaction_increments_one_counter_without_touching_status() {
        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(state_with(&[1, 2]))
            .when_action(PostsAction::ReactionAdded {
                id: PostId(2),
                reaction: ReactionKind::Heart,
            })
            .then_state(|state| {
                assert_eq!(state.get(PostId(2)).unwrap().reactions.heart, 1);
                assert_eq!(state.get(PostId(2)).unwrap().reactions.total(), 1);
                assert_eq!(state.get(PostId(1)).unwrap().reactions.total(), 0);
                assert_eq!(state.status(), RequestStatus::Succeeded);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn reaction_for_unknown_post_is_ignored() {
        let before = state_with(&[1]);
        let expected = before.clone();

        ReducerTest::new(PostsReducer::new())
            .with_env(env())
            .given_state(before)
            .when_action(PostsAction::ReactionAdded {
                id: PostId(99),
                reaction: ReactionKind::Wow,
            })
            .then_state(move |state| assert_eq!(*state, expected))
            .run();
    }

    #[test]
    fn by_recency_orders_newest_first() {
        let mut state = PostsState::new();
        PostsReducer::apply_fetched(&mut state, vec![record(1), record(2)], now());
        state.upsert(into_post(record(3), Timestamp::client(now()), Reactions::default()));

        let ids: Vec<u64> = state.by_recency().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn excerpt_is_char_bounded() {
        let mut long = post(1);
        long.body = "é".repeat(100);
        assert_eq!(excerpt(&long).chars().count(), EXCERPT_LEN);

        let short = post(2);
        assert_eq!(excerpt(&short), "Body 2");
    }

    #[test]
    fn completions_expose_request_id() {
        let request_id = RequestId::new();
        let completion = PostsAction::PostDeleted {
            request_id,
            result: Ok(PostId(1)),
        };
        assert_eq!(completion.completes(), Some(request_id));
        assert_eq!(
            PostsAction::DeletePost {
                request_id,
                id: PostId(1)
            }
            .completes(),
            None
        );
    }
}
