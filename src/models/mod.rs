/// Database entities
///
/// One struct per table, mapped with `sqlx::FromRow`. Request/response DTOs
/// live next to their handlers; joined projection rows live next to the
/// repository queries that produce them.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile visibility. Stored as TEXT (`public` / `private`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum PrivacySetting {
    Public,
    Private,
}

impl Default for PrivacySetting {
    fn default() -> Self {
        PrivacySetting::Public
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: Option<String>,
    pub image_profile: Option<String>,
    pub privacy_setting: PrivacySetting,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub body: String,
    pub image_post: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follower {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Commentary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Blocked {
    pub id: Uuid,
    pub blocker_id: Uuid,
    pub blocked_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduledPost {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub body: String,
    pub publish_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Path users see when a profile has no uploaded image.
pub const DEFAULT_PROFILE_IMAGE: &str = "static/default_image/default_profile.png";

// Projection rows produced by joined queries. Field names double as the
// JSON keys of the corresponding responses.

/// Raw feed candidate: a post joined with its owner's username and privacy.
/// Owners without a profile row read as public.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedCandidate {
    pub post_id: Uuid,
    pub title: String,
    pub image_post: Option<String>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_privacy: PrivacySetting,
    pub created_at: DateTime<Utc>,
}

/// Post joined with its owner's username, for the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostWithOwner {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub body: String,
    pub image_post: Option<String>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// Commentary joined with its author's username.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub user: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Like joined with the liking user's username.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LikeWithUser {
    pub id: Uuid,
    pub user: String,
}

/// Block edge joined with the blocked user's username.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlockedUserEntry {
    pub id: Uuid,
    pub blocked: String,
}

/// Like joined with the liked post's title, for the viewer's liked list.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LikedPostEntry {
    pub id: Uuid,
    pub post: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user engagement counters for profile pages.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileCounts {
    pub following: i64,
    pub followers: i64,
    pub liked: i64,
    pub blocked: i64,
}
