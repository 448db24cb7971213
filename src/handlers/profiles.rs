/// Profile endpoints: public profile pages, the viewer's own profile,
/// image upload, and the viewer's relationship listings.
use crate::config::Config;
use crate::db::{block_repo, follow_repo, like_repo, profile_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{PrivacySetting, DEFAULT_PROFILE_IMAGE};
use crate::services::media;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    /// Present only on the viewer's own profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub description: Option<String>,
    pub image_profile: String,
    pub privacy_setting: PrivacySetting,
    pub following: i64,
    pub followers: i64,
    pub liked: i64,
    pub blocked: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub privacy_setting: Option<PrivacySetting>,
}

async fn profile_response(pool: &PgPool, user_id: Uuid) -> Result<ProfileResponse> {
    let user = user_repo::get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    let profile = profile_repo::get_by_user_id(pool, user_id).await?;
    let counts = profile_repo::counts_for_user(pool, user_id).await?;

    let (description, image_profile, privacy_setting) = match profile {
        Some(p) => (
            p.description,
            p.image_profile
                .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_string()),
            p.privacy_setting,
        ),
        None => (
            None,
            DEFAULT_PROFILE_IMAGE.to_string(),
            PrivacySetting::default(),
        ),
    };

    Ok(ProfileResponse {
        id: user.id,
        username: user.username,
        email: None,
        description,
        image_profile,
        privacy_setting,
        following: counts.following,
        followers: counts.followers,
        liked: counts.liked,
        blocked: counts.blocked,
        created_at: user.created_at,
    })
}

/// Public profile page for any user.
pub async fn get_profile(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let response = profile_response(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn my_profile(pool: web::Data<PgPool>, current: CurrentUser) -> Result<HttpResponse> {
    let mut response = profile_response(&pool, current.user.id).await?;
    response.email = Some(current.user.email);
    Ok(HttpResponse::Ok().json(response))
}

/// Lazily creates the profile row on the first write.
pub async fn update_my_profile(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let profile = profile_repo::update(
        &pool,
        current.user.id,
        req.description.as_deref(),
        req.privacy_setting,
    )
    .await?;

    Ok(HttpResponse::Ok().json(profile))
}

pub async fn upload_profile_image(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    current: CurrentUser,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?;

        if field.name() != Some("image") {
            continue;
        }

        let path = media::store_image(
            &config.media,
            media::PROFILE_IMAGE_PREFIX,
            &current.user.username,
            &mut field,
        )
        .await?;

        let profile = profile_repo::set_image(&pool, current.user.id, &path).await?;
        return Ok(HttpResponse::Ok().json(profile));
    }

    Err(AppError::Validation("Image field is required.".to_string()))
}

/// The viewer's follower and following username lists.
pub async fn followers_following(
    pool: web::Data<PgPool>,
    current: CurrentUser,
) -> Result<HttpResponse> {
    let followers = follow_repo::follower_usernames(&pool, current.user.id).await?;
    let following = follow_repo::following_usernames(&pool, current.user.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "followers": followers,
        "following": following,
    })))
}

pub async fn liked_posts(pool: web::Data<PgPool>, current: CurrentUser) -> Result<HttpResponse> {
    let liked = like_repo::list_liked_by_user(&pool, current.user.id).await?;
    Ok(HttpResponse::Ok().json(liked))
}

pub async fn blocked_users(pool: web::Data<PgPool>, current: CurrentUser) -> Result<HttpResponse> {
    let blocked = block_repo::list_blocked(&pool, current.user.id).await?;
    Ok(HttpResponse::Ok().json(blocked))
}

/// Fixed segments (`me`, listings) are registered before `{user_id}` so
/// they are never captured by the id pattern.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile/me", web::get().to(my_profile))
        .route("/profile/me", web::patch().to(update_my_profile))
        .route("/profile/me/image", web::post().to(upload_profile_image))
        .route(
            "/profile/followers-following",
            web::get().to(followers_following),
        )
        .route("/profile/liked", web::get().to(liked_posts))
        .route("/profile/blocked-users", web::get().to(blocked_users))
        .route("/profile/{user_id}", web::get().to(get_profile));
}
