//! Blog post manager state layer.
//!
//! Keeps a local copy of a REST API's posts and users in a [`Store`], fed by
//! asynchronous fetch/create/update/delete requests, with local-only reaction
//! counters on each post.
//!
//! - Posts slice: collection, request status and last error ([`posts`])
//! - Users slice: read-only mirror used for author names ([`users`])
//! - HTTP adapter: [`ReqwestHttpClient`] behind the `HttpClient` trait
//! - [`Postboard`]: awaitable entry points over one store
//!
//! # Quick Start
//!
//! ```no_run
//! use postboard::{ApiConfig, NewPost, Postboard, ReactionKind, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let board = Postboard::connect(ApiConfig::from_env()?)?;
//!
//! board.fetch_users().await?;
//! board.fetch_posts().await?;
//!
//! let post = board
//!     .create_post(NewPost::new("Hello", "First post", UserId(1)))
//!     .await?;
//! board.add_reaction(post.id, ReactionKind::Rocket).await?;
//!
//! for post in board.posts_by_recency().await.iter().take(3) {
//!     println!("{} by {}", post.title, board.author_name(post.user_id).await);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Store`]: postboard_runtime::Store

pub mod api;
pub mod app;
pub mod board;
pub mod client;
pub mod config;
pub mod environment;
pub mod error;
pub mod posts;
pub mod types;
pub mod users;

// Re-export commonly used types
pub use app::{BlogAction, BlogReducer, BlogState};
pub use board::{BlogStore, Postboard};
pub use client::ReqwestHttpClient;
pub use config::{ApiConfig, ConfigError};
pub use environment::BlogEnvironment;
pub use error::{ApiError, ErrorKind};
pub use posts::{PostsAction, PostsReducer, PostsState, excerpt};
pub use types::{
    NewPost, Post, PostId, PostUpdate, ReactionKind, Reactions, RequestId, RequestStatus, Timestamp,
    TimestampOrigin, User, UserId,
};
pub use users::{UsersAction, UsersReducer, UsersState};
