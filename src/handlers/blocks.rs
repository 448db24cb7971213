/// Block endpoints. A block hides the blocked owner's posts from the
/// blocker's feed unconditionally; self-blocking is rejected outright.
use crate::db::{block_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn block(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let target = user_repo::get_user_by_id(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    if target.id == current.user.id {
        return Err(AppError::Conflict(
            "You can not block yourself.".to_string(),
        ));
    }

    match block_repo::create_block(&pool, current.user.id, target.id).await? {
        Some(_) => Ok(HttpResponse::Created().json(serde_json::json!({
            "detail": format!("{} blocked successfully.", target.username)
        }))),
        None => Err(AppError::Conflict(format!(
            "{} already blocked.",
            target.username
        ))),
    }
}

pub async fn unblock(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let target = user_repo::get_user_by_id(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    if target.id == current.user.id {
        return Err(AppError::Conflict(
            "You can not unblock yourself.".to_string(),
        ));
    }

    if block_repo::delete_block(&pool, current.user.id, target.id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::Conflict(format!(
            "{} already unblocked.",
            target.username
        )))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile/{user_id}/block", web::post().to(block))
        .route("/profile/{user_id}/block", web::delete().to(unblock));
}
