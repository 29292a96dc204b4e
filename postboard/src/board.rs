//! `Postboard`: an explicit container around the blog store.
//!
//! Each async entry point sends its request action and waits for the
//! completion carrying the same [`RequestId`]. Completions are broadcast only
//! after they are reduced, so the selectors already reflect the result when
//! a method returns.

use crate::app::{BlogAction, BlogReducer, BlogState};
use crate::config::ApiConfig;
use crate::environment::BlogEnvironment;
use crate::error::ApiError;
use crate::posts::PostsAction;
use crate::types::{
    NewPost, Post, PostId, PostUpdate, ReactionKind, RequestId, RequestStatus, User, UserId,
};
use crate::users::UsersAction;
use postboard_runtime::{Store, StoreError};
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

/// The store type behind [`Postboard`]
pub type BlogStore = Store<BlogState, BlogAction, BlogEnvironment, BlogReducer>;

/// Blog post manager bound to one REST API
#[derive(Clone)]
pub struct Postboard {
    store: BlogStore,
    response_timeout: Duration,
}

impl Postboard {
    /// Connect to the API described by `config` using `reqwest`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built
    pub fn connect(config: ApiConfig) -> Result<Self, ApiError> {
        let environment = BlogEnvironment::production(config)?;
        Ok(Self::with_environment(environment))
    }

    /// Build on an explicit environment (tests, alternative clients)
    #[must_use]
    pub fn with_environment(environment: BlogEnvironment) -> Self {
        let response_timeout = environment.config.response_timeout;
        Self {
            store: Store::new(BlogState::default(), BlogReducer::new(), environment),
            response_timeout,
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &BlogStore {
        &self.store
    }

    // ========== Posts ==========

    /// Fetch all posts and append them; returns how many arrived
    ///
    /// # Errors
    ///
    /// The fetch failure, also recorded in the posts slice
    pub async fn fetch_posts(&self) -> Result<usize, ApiError> {
        let request_id = RequestId::new();
        match self.request(PostsAction::FetchPosts { request_id }.into(), request_id).await? {
            BlogAction::Posts(PostsAction::PostsFetched { result, .. }) => result.map(|records| records.len()),
            other => Err(unexpected(&other)),
        }
    }

    /// Fetch posts only if no fetch or mutation has started yet
    ///
    /// Returns `Ok(true)` if a fetch was issued and succeeded, `Ok(false)` if
    /// the slice was not idle.
    ///
    /// # Errors
    ///
    /// The fetch failure, if one was issued
    pub async fn ensure_posts_loaded(&self) -> Result<bool, ApiError> {
        let request_id = RequestId::new();
        let mut completions = self.store.subscribe_actions();

        let mut handle = self
            .store
            .send(PostsAction::LoadIfIdle { request_id }.into())
            .await?;
        handle.wait_with_timeout(self.response_timeout).await?;

        loop {
            match completions.try_recv() {
                Ok(BlogAction::Posts(PostsAction::PostsFetched { request_id: id, result }))
                    if id == request_id =>
                {
                    return result.map(|_| true);
                },
                Ok(_) => {},
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Completion observer lagged");
                },
                Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(false),
            }
        }
    }

    /// Create a post; returns it as stored
    ///
    /// # Errors
    ///
    /// The create failure, also recorded in the posts slice
    pub async fn create_post(&self, post: NewPost) -> Result<Post, ApiError> {
        let request_id = RequestId::new();
        match self
            .request(PostsAction::CreatePost { request_id, post }.into(), request_id)
            .await?
        {
            BlogAction::Posts(PostsAction::PostCreated { result, .. }) => self.stored_post(result?.id).await,
            other => Err(unexpected(&other)),
        }
    }

    /// Replace a post; returns it as stored
    ///
    /// # Errors
    ///
    /// The update failure, also recorded in the posts slice
    pub async fn update_post(&self, update: PostUpdate) -> Result<Post, ApiError> {
        let request_id = RequestId::new();
        match self
            .request(PostsAction::UpdatePost { request_id, update }.into(), request_id)
            .await?
        {
            BlogAction::Posts(PostsAction::PostUpdated { result, .. }) => self.stored_post(result?.id).await,
            other => Err(unexpected(&other)),
        }
    }

    /// Delete a post
    ///
    /// # Errors
    ///
    /// The delete failure (any status but 200), also recorded in the posts slice
    pub async fn delete_post(&self, id: PostId) -> Result<(), ApiError> {
        let request_id = RequestId::new();
        match self
            .request(PostsAction::DeletePost { request_id, id }.into(), request_id)
            .await?
        {
            BlogAction::Posts(PostsAction::PostDeleted { result, .. }) => result.map(|_| ()),
            other => Err(unexpected(&other)),
        }
    }

    /// Add one to a post's reaction counter; unknown posts are ignored
    ///
    /// # Errors
    ///
    /// `ApiError::Runtime` if the store is shutting down
    pub async fn add_reaction(&self, id: PostId, reaction: ReactionKind) -> Result<(), ApiError> {
        self.store
            .send(PostsAction::ReactionAdded { id, reaction }.into())
            .await?;
        Ok(())
    }

    /// All posts in insertion order
    pub async fn posts(&self) -> Vec<Post> {
        self.store.state(|s| s.posts.posts.clone()).await
    }

    /// Posts newest first
    pub async fn posts_by_recency(&self) -> Vec<Post> {
        self.store.state(|s| s.posts.by_recency()).await
    }

    /// A post by id
    pub async fn post(&self, id: PostId) -> Option<Post> {
        self.store.state(|s| s.posts.get(id).cloned()).await
    }

    /// Posts slice status
    pub async fn posts_status(&self) -> RequestStatus {
        self.store.state(|s| s.posts.status).await
    }

    /// Posts slice error
    pub async fn posts_error(&self) -> Option<String> {
        self.store.state(|s| s.posts.error.clone()).await
    }

    // ========== Users ==========

    /// Fetch all users, replacing the list; returns how many arrived
    ///
    /// # Errors
    ///
    /// The fetch failure, also recorded in the users slice
    pub async fn fetch_users(&self) -> Result<usize, ApiError> {
        let request_id = RequestId::new();
        match self.request(UsersAction::FetchUsers { request_id }.into(), request_id).await? {
            BlogAction::Users(UsersAction::UsersFetched { result, .. }) => result.map(|users| users.len()),
            other => Err(unexpected(&other)),
        }
    }

    /// All users
    pub async fn users(&self) -> Vec<User> {
        self.store.state(|s| s.users.users.clone()).await
    }

    /// Users slice status
    pub async fn users_status(&self) -> RequestStatus {
        self.store.state(|s| s.users.status).await
    }

    /// The user's name, or `"Unknown author"`
    pub async fn author_name(&self, id: UserId) -> String {
        self.store.state(|s| s.users.author_name(id).to_string()).await
    }

    /// Stop accepting actions and wait for in-flight requests
    ///
    /// # Errors
    ///
    /// `ApiError::Runtime` if requests are still running after the response timeout
    pub async fn shutdown(&self) -> Result<(), ApiError> {
        Ok(self.store.shutdown(self.response_timeout).await?)
    }

    async fn request(&self, action: BlogAction, request_id: RequestId) -> Result<BlogAction, StoreError> {
        self.store
            .send_and_wait_for(
                action,
                move |candidate| candidate.completes() == Some(request_id),
                self.response_timeout,
            )
            .await
    }

    async fn stored_post(&self, id: PostId) -> Result<Post, ApiError> {
        self.post(id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("post {id}")))
    }
}

impl std::fmt::Debug for Postboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Postboard")
            .field("response_timeout", &self.response_timeout)
            .finish_non_exhaustive()
    }
}

fn unexpected(action: &BlogAction) -> ApiError {
    ApiError::Runtime(format!("unexpected completion: {action:?}"))
}
