//! Domain types for posts, users and reactions.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Server-assigned post identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned user identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlates a request action with its completion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new random `RequestId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed set of reactions a post can receive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReactionKind {
    /// 👍
    ThumbsUp,
    /// 😮
    Wow,
    /// ❤️
    Heart,
    /// 🚀
    Rocket,
    /// ☕
    Coffee,
}

impl ReactionKind {
    /// All reactions, in display order
    pub const ALL: [Self; 5] = [Self::ThumbsUp, Self::Wow, Self::Heart, Self::Rocket, Self::Coffee];

    /// Wire name (`thumbsUp`, `wow`, ...)
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ThumbsUp => "thumbsUp",
            Self::Wow => "wow",
            Self::Heart => "heart",
            Self::Rocket => "rocket",
            Self::Coffee => "coffee",
        }
    }

    /// Emoji shown next to the counter
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::ThumbsUp => "👍",
            Self::Wow => "😮",
            Self::Heart => "❤️",
            Self::Rocket => "🚀",
            Self::Coffee => "☕",
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized reaction name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown reaction: {0}")]
pub struct UnknownReaction(pub String);

impl FromStr for ReactionKind {
    type Err = UnknownReaction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownReaction(s.to_string()))
    }
}

/// Per-post reaction counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reactions {
    /// 👍 count
    #[serde(default)]
    pub thumbs_up: u32,
    /// 😮 count
    #[serde(default)]
    pub wow: u32,
    /// ❤️ count
    #[serde(default)]
    pub heart: u32,
    /// 🚀 count
    #[serde(default)]
    pub rocket: u32,
    /// ☕ count
    #[serde(default)]
    pub coffee: u32,
}

impl Reactions {
    /// Count for one reaction
    #[must_use]
    pub const fn get(&self, kind: ReactionKind) -> u32 {
        match kind {
            ReactionKind::ThumbsUp => self.thumbs_up,
            ReactionKind::Wow => self.wow,
            ReactionKind::Heart => self.heart,
            ReactionKind::Rocket => self.rocket,
            ReactionKind::Coffee => self.coffee,
        }
    }

    /// Add one to a counter
    pub fn increment(&mut self, kind: ReactionKind) {
        let counter = match kind {
            ReactionKind::ThumbsUp => &mut self.thumbs_up,
            ReactionKind::Wow => &mut self.wow,
            ReactionKind::Heart => &mut self.heart,
            ReactionKind::Rocket => &mut self.rocket,
            ReactionKind::Coffee => &mut self.coffee,
        };
        *counter = counter.saturating_add(1);
    }

    /// Counters paired with their reaction, in display order
    pub fn iter(&self) -> impl Iterator<Item = (ReactionKind, u32)> + '_ {
        ReactionKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Sum of all counters
    #[must_use]
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, count)| u64::from(count)).sum()
    }
}

/// Where a post's timestamp came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampOrigin {
    /// Display-ordering offset assigned when posts are fetched
    Synthetic,
    /// Stamped locally on create or update
    Client,
}

/// A post's display timestamp. Never server data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    /// Instant
    pub at: DateTime<Utc>,
    /// Provenance
    pub origin: TimestampOrigin,
}

impl Timestamp {
    /// Ordering offset assigned on fetch
    #[must_use]
    pub const fn synthetic(at: DateTime<Utc>) -> Self {
        Self {
            at,
            origin: TimestampOrigin::Synthetic,
        }
    }

    /// Local stamp on create or update
    #[must_use]
    pub const fn client(at: DateTime<Utc>) -> Self {
        Self {
            at,
            origin: TimestampOrigin::Client,
        }
    }

    /// Relative description such as `"5 minutes ago"`
    ///
    /// Minutes are rounded to the nearest whole minute, and 45 minutes
    /// already reads as "about 1 hour".
    #[must_use]
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let seconds = (now - self.at).num_seconds().max(0);
        let minutes = (seconds + 30) / 60;

        let distance = if minutes < 1 {
            "less than a minute".to_string()
        } else if minutes < 45 {
            counted(minutes, "minute")
        } else if minutes < 90 {
            "about 1 hour".to_string()
        } else if minutes < MINUTES_IN_DAY {
            format!("about {}", counted(rounded(minutes, 60), "hour"))
        } else if minutes < 2520 {
            "1 day".to_string()
        } else if minutes < MINUTES_IN_MONTH {
            counted(rounded(minutes, MINUTES_IN_DAY), "day")
        } else if minutes < 2 * MINUTES_IN_MONTH {
            format!("about {}", counted(rounded(minutes, MINUTES_IN_MONTH), "month"))
        } else {
            let months = calendar_months(self.at, now);
            if months < 12 {
                counted(rounded(minutes, MINUTES_IN_MONTH), "month")
            } else {
                let years = months / 12;
                match months % 12 {
                    0..3 => format!("about {}", counted(years, "year")),
                    3..9 => format!("over {}", counted(years, "year")),
                    _ => format!("almost {}", counted(years + 1, "year")),
                }
            }
        };
        format!("{distance} ago")
    }
}

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43_200;

fn rounded(minutes: i64, unit: i64) -> i64 {
    (minutes + unit / 2) / unit
}

fn counted(n: i64, unit: &str) -> String {
    let suffix = if n == 1 { "" } else { "s" };
    format!("{n} {unit}{suffix}")
}

/// Whole calendar months from `from` to `to`
fn calendar_months(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month());
    if months > 0 && (to.day(), to.time()) < (from.day(), from.time()) {
        months - 1
    } else {
        months
    }
}

/// A blog post as held in the store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: PostId,
    /// Author
    pub user_id: UserId,
    /// Title
    pub title: String,
    /// Body text
    pub body: String,
    /// Display timestamp
    pub timestamp: Timestamp,
    /// Reaction counters
    pub reactions: Reactions,
}

/// A user as mirrored from the API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
}

/// Lifecycle of a slice's async operations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Succeeded,
    /// The last request failed
    Failed,
}

/// Fields for a post to be created
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    /// Title
    pub title: String,
    /// Body text
    pub body: String,
    /// Author
    pub user_id: UserId,
}

impl NewPost {
    /// Creates a new draft
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, user_id: UserId) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            user_id,
        }
    }

    /// Whether the draft has a title, a body and an author
    #[must_use]
    pub fn can_save(&self) -> bool {
        !self.title.trim().is_empty() && !self.body.trim().is_empty() && self.user_id.0 != 0
    }
}

/// Replacement fields for an existing post
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    /// Post to replace
    pub id: PostId,
    /// New title
    pub title: String,
    /// New body
    pub body: String,
    /// New author
    pub user_id: UserId,
    /// Reactions to keep if the server does not echo them
    pub reactions: Reactions,
}

impl PostUpdate {
    /// Starts an update from the post's current fields
    #[must_use]
    pub fn from_post(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            user_id: post.user_id,
            reactions: post.reactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn reaction_names_round_trip_through_from_str() {
        for kind in ReactionKind::ALL {
            assert_eq!(kind.name().parse::<ReactionKind>(), Ok(kind));
        }
        assert_eq!(
            "eyes".parse::<ReactionKind>(),
            Err(UnknownReaction("eyes".to_string()))
        );
    }

    #[test]
    fn reactions_serialize_with_wire_names() {
        let mut reactions = Reactions::default();
        reactions.increment(ReactionKind::ThumbsUp);
        let value = serde_json::to_value(reactions).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "thumbsUp": 1, "wow": 0, "heart": 0, "rocket": 0, "coffee": 0 })
        );
    }

    #[test]
    fn increment_touches_one_counter() {
        let mut reactions = Reactions::default();
        reactions.increment(ReactionKind::Rocket);
        reactions.increment(ReactionKind::Rocket);

        assert_eq!(reactions.get(ReactionKind::Rocket), 2);
        assert_eq!(reactions.total(), 2);
        assert_eq!(reactions.iter().filter(|(_, n)| *n > 0).count(), 1);
    }

    #[test]
    fn time_ago_buckets() {
        let now = noon();
        let at = |minutes: i64| Timestamp::synthetic(now - chrono::Duration::minutes(minutes));

        assert_eq!(at(0).time_ago(now), "less than a minute ago");
        assert_eq!(at(1).time_ago(now), "1 minute ago");
        assert_eq!(at(44).time_ago(now), "44 minutes ago");
        assert_eq!(at(45).time_ago(now), "about 1 hour ago");
        assert_eq!(at(60 * 5).time_ago(now), "about 5 hours ago");
        assert_eq!(at(60 * 30).time_ago(now), "1 day ago");
        assert_eq!(at(60 * 24 * 3).time_ago(now), "3 days ago");
        assert_eq!(at(60 * 24 * 40).time_ago(now), "about 1 month ago");
        assert_eq!(at(60 * 24 * 65).time_ago(now), "2 months ago");
        assert_eq!(at(60 * 24 * 200).time_ago(now), "7 months ago");
    }

    #[test]
    fn time_ago_years_use_calendar_months() {
        let now = noon();
        let years_back = |year: i32, month: u32| {
            Timestamp::synthetic(Utc.with_ymd_and_hms(year, month, 1, 12, 0, 0).unwrap())
        };

        assert_eq!(years_back(2023, 12).time_ago(now), "about 1 year ago");
        assert_eq!(years_back(2023, 6).time_ago(now), "over 1 year ago");
        assert_eq!(years_back(2022, 3).time_ago(now), "almost 3 years ago");
    }

    #[test]
    fn future_timestamp_reads_as_now() {
        let now = noon();
        let ahead = Timestamp::client(now + chrono::Duration::minutes(5));
        assert_eq!(ahead.time_ago(now), "less than a minute ago");
    }

    #[test]
    fn can_save_requires_every_field() {
        assert!(NewPost::new("Title", "Body", UserId(1)).can_save());
        assert!(!NewPost::new("  ", "Body", UserId(1)).can_save());
        assert!(!NewPost::new("Title", "", UserId(1)).can_save());
        assert!(!NewPost::new("Title", "Body", UserId(0)).can_save());
    }
}
