/// Follow endpoints. The unique (follower, following) constraint is the
/// authoritative duplicate guard; pre-checks only shape the messages.
use crate::db::{follow_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn follow(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let target = user_repo::get_user_by_id(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    if target.id == current.user.id {
        return Err(AppError::Conflict(
            "You can not follow yourself.".to_string(),
        ));
    }

    match follow_repo::create_follow(&pool, current.user.id, target.id).await? {
        Some(edge) => Ok(HttpResponse::Created().json(edge)),
        None => Err(AppError::Conflict("You have already followed!".to_string())),
    }
}

pub async fn unfollow(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let target = user_repo::get_user_by_id(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    if follow_repo::delete_follow(&pool, current.user.id, target.id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::Conflict(
            "You have not already followed!".to_string(),
        ))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile/{user_id}/follow", web::post().to(follow))
        .route("/profile/{user_id}/follow", web::delete().to(unfollow));
}
