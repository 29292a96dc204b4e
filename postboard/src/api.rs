//! REST endpoint codecs.
//!
//! Builds the [`HttpRequest`] for each operation and interprets the
//! [`HttpResponse`] that comes back. Status handling lives here, not in the
//! HTTP client: 404 is [`ApiError::NotFound`], other non-2xx statuses are
//! [`ApiError::Status`], and a delete only counts when the server answers 200.

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{NewPost, PostId, PostUpdate, Reactions, User, UserId};
use postboard_core::http::{HttpRequest, HttpResponse};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

/// A post as the API returns it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Server-assigned id; a record without one is malformed
    pub id: PostId,
    /// Author, accepted as a number or a numeric string
    #[serde(deserialize_with = "lenient_user_id")]
    pub user_id: UserId,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Body text
    #[serde(default)]
    pub body: String,
    /// Reactions, when the server echoes them
    #[serde(default)]
    pub reactions: Option<Reactions>,
}

fn lenient_user_id<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(UserId(n)),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map(UserId)
            .map_err(|_| serde::de::Error::custom(format!("userId is not a number: {s:?}"))),
    }
}

/// `GET /posts`
#[must_use]
pub fn fetch_posts(config: &ApiConfig) -> HttpRequest {
    HttpRequest::get(config.posts_path.clone())
}

/// `POST /posts` with `{title, body, userId}`
#[must_use]
pub fn create_post(config: &ApiConfig, post: &NewPost) -> HttpRequest {
    HttpRequest::post(
        config.posts_path.clone(),
        json!({
            "title": post.title,
            "body": post.body,
            "userId": post.user_id,
        }),
    )
}

/// `PUT /posts/{id}` with the full post
#[must_use]
pub fn update_post(config: &ApiConfig, update: &PostUpdate) -> HttpRequest {
    HttpRequest::put(
        config.post_path(update.id),
        json!({
            "id": update.id,
            "title": update.title,
            "body": update.body,
            "userId": update.user_id,
            "reactions": update.reactions,
        }),
    )
}

/// `DELETE /posts/{id}`
#[must_use]
pub fn delete_post(config: &ApiConfig, id: PostId) -> HttpRequest {
    HttpRequest::delete(config.post_path(id))
}

/// `GET /users`
#[must_use]
pub fn fetch_users(config: &ApiConfig) -> HttpRequest {
    HttpRequest::get(config.users_path.clone())
}

/// Decode the post list
///
/// # Errors
///
/// Status errors per [`check_status`], or `MalformedResponse` if the body is
/// not a list of posts.
pub fn decode_posts(response: &HttpResponse) -> Result<Vec<PostRecord>, ApiError> {
    check_status(response, "posts")?;
    Ok(response.json()?)
}

/// Decode a single created or updated post
///
/// # Errors
///
/// Status errors per [`check_status`], or `MalformedResponse` if the body is
/// not a post (including a missing `id`).
pub fn decode_post(response: &HttpResponse) -> Result<PostRecord, ApiError> {
    check_status(response, "post")?;
    Ok(response.json()?)
}

/// Decode the user list; unknown fields are ignored
///
/// # Errors
///
/// Status errors per [`check_status`], or `MalformedResponse` if the body is
/// not a list of users.
pub fn decode_users(response: &HttpResponse) -> Result<Vec<User>, ApiError> {
    check_status(response, "users")?;
    Ok(response.json()?)
}

/// Interpret a delete response; only `200` is success
///
/// # Errors
///
/// `NotFound` on 404, `Status` on anything else but 200.
pub fn decode_delete(response: &HttpResponse, id: PostId) -> Result<PostId, ApiError> {
    match response.status {
        200 => Ok(id),
        404 => Err(ApiError::NotFound(format!("post {id}"))),
        status => Err(ApiError::Status {
            status,
            message: body_text(&response.body),
        }),
    }
}

/// Map non-2xx statuses to errors
///
/// # Errors
///
/// `NotFound` on 404, `Status` on any other non-2xx status.
pub fn check_status(response: &HttpResponse, resource: &str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound(resource.to_string()));
    }
    Err(ApiError::Status {
        status: response.status,
        message: body_text(&response.body),
    })
}

fn body_text(body: &Value) -> String {
    match body {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
