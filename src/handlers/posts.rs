/// Post endpoints: the resolved feed, post CRUD, and post image upload.
use crate::config::Config;
use crate::db::{comment_repo, like_repo, post_repo, scheduled_post_repo};
use crate::error::{AppError, Result};
use crate::handlers::Pagination;
use crate::middleware::{CurrentUser, MaybeUser};
use crate::models::{CommentWithAuthor, Post, PostWithOwner};
use crate::services::{feed, media, visibility};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
    /// Future timestamps queue the post for the publisher job.
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub image_post: Option<String>,
    pub owner: String,
    pub likes_count: i64,
    pub commentaries_count: i64,
    pub commentaries: Vec<CommentWithAuthor>,
    pub created_at: DateTime<Utc>,
}

pub(super) async fn load_post(pool: &PgPool, id: Uuid) -> Result<Post> {
    post_repo::find_post_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found.".to_string()))
}

/// The feed: viewer-filtered, ranked, paginated. Anonymous viewers are
/// served the public-only listing.
pub async fn list_posts(
    pool: web::Data<PgPool>,
    viewer: MaybeUser,
    pagination: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let viewer_id = viewer.0.map(|c| c.user.id);

    let page =
        feed::resolve_feed(&pool, viewer_id, pagination.limit(), pagination.offset()).await?;

    Ok(HttpResponse::Ok().json(page))
}

pub async fn create_post(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    match req.scheduled_at {
        Some(publish_at) if publish_at > Utc::now() => {
            let scheduled = scheduled_post_repo::create(
                &pool,
                current.user.id,
                &req.title,
                &req.body,
                publish_at,
            )
            .await?;

            tracing::info!(
                scheduled_id = %scheduled.id,
                publish_at = %scheduled.publish_at,
                "Post scheduled"
            );
            Ok(HttpResponse::Accepted().json(scheduled))
        }
        Some(publish_at) => {
            // Past timestamps publish immediately, dated as requested.
            let post =
                post_repo::create_post_at(&pool, current.user.id, &req.title, &req.body, publish_at)
                    .await?;
            Ok(HttpResponse::Created().json(post))
        }
        None => {
            let post = post_repo::create_post(&pool, current.user.id, &req.title, &req.body).await?;
            Ok(HttpResponse::Created().json(post))
        }
    }
}

/// Post detail with body and comments, behind the per-item view gate.
pub async fn get_post(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post: PostWithOwner = post_repo::find_with_owner(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found.".to_string()))?;

    visibility::check_can_view(&pool, current.user.id, post.owner_id).await?;

    let commentaries = comment_repo::list_for_post(&pool, post.id).await?;
    let likes_count = like_repo::count_by_posts(&pool, &[post.id])
        .await?
        .first()
        .map(|(_, n)| *n)
        .unwrap_or(0);

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        id: post.id,
        title: post.title,
        body: post.body,
        image_post: post.image_post,
        owner: post.owner,
        likes_count,
        commentaries_count: commentaries.len() as i64,
        commentaries,
        created_at: post.created_at,
    }))
}

pub async fn update_post(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = load_post(&pool, path.into_inner()).await?;
    if post.owner_id != current.user.id {
        return Err(AppError::Forbidden(
            "You do not have permission to edit this post.".to_string(),
        ));
    }

    let updated =
        post_repo::update_post(&pool, post.id, req.title.as_deref(), req.body.as_deref()).await?;

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_post(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = load_post(&pool, path.into_inner()).await?;
    if post.owner_id != current.user.id {
        return Err(AppError::Forbidden(
            "You do not have permission to delete this post.".to_string(),
        ));
    }

    post_repo::delete_post(&pool, post.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn upload_post_image(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let post = load_post(&pool, path.into_inner()).await?;
    if post.owner_id != current.user.id {
        return Err(AppError::Forbidden(
            "You do not have permission to edit this post.".to_string(),
        ));
    }

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?;

        if field.name() != Some("image") {
            continue;
        }

        let image_path =
            media::store_image(&config.media, media::POST_IMAGE_PREFIX, &post.title, &mut field)
                .await?;

        let updated = post_repo::set_image(&pool, post.id, &image_path).await?;
        return Ok(HttpResponse::Ok().json(updated));
    }

    Err(AppError::Validation("Image field is required.".to_string()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/posts", web::get().to(list_posts))
        .route("/posts", web::post().to(create_post))
        .route("/posts/{id}", web::get().to(get_post))
        .route("/posts/{id}", web::patch().to(update_post))
        .route("/posts/{id}", web::delete().to(delete_post))
        .route("/posts/{id}/image", web::post().to(upload_post_image));
}
