/// Like endpoints under a post, behind the per-item access gates.
use crate::db::like_repo;
use crate::error::{AppError, Result};
use crate::handlers::posts::load_post;
use crate::middleware::CurrentUser;
use crate::services::visibility;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

/// Users who liked a post.
pub async fn list_likes(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = load_post(&pool, path.into_inner()).await?;
    visibility::check_can_view(&pool, current.user.id, post.owner_id).await?;

    let likes = like_repo::list_for_post(&pool, post.id).await?;
    Ok(HttpResponse::Ok().json(likes))
}

pub async fn like_post(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = load_post(&pool, path.into_inner()).await?;
    visibility::check_can_like(&pool, current.user.id, post.owner_id).await?;

    match like_repo::create_like(&pool, current.user.id, post.id).await? {
        Some(like) => Ok(HttpResponse::Created().json(like)),
        None => Err(AppError::Conflict(
            "You have already liked this post.".to_string(),
        )),
    }
}

pub async fn unlike_post(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = load_post(&pool, path.into_inner()).await?;

    if like_repo::delete_like(&pool, current.user.id, post.id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::Conflict(
            "You have not already liked this post.".to_string(),
        ))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/posts/{id}/likes", web::get().to(list_likes))
        .route("/posts/{id}/likes", web::post().to(like_post))
        .route("/posts/{id}/likes", web::delete().to(unlike_post));
}
