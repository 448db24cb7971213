/// Commentary endpoints under a post. Creation sits behind the comment
/// gate; deletion is restricted to the comment's author.
use crate::db::comment_repo;
use crate::error::{AppError, Result};
use crate::handlers::posts::load_post;
use crate::middleware::CurrentUser;
use crate::services::visibility;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub body: Option<String>,
}

pub async fn list_comments(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = load_post(&pool, path.into_inner()).await?;
    visibility::check_can_view(&pool, current.user.id, post.owner_id).await?;

    let comments = comment_repo::list_for_post(&pool, post.id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn create_comment(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let body = match req.body.as_deref().map(str::trim) {
        Some(body) if !body.is_empty() => body,
        _ => return Err(AppError::Validation("Body is required.".to_string())),
    };

    let post = load_post(&pool, path.into_inner()).await?;
    visibility::check_can_comment(&pool, current.user.id, post.owner_id).await?;

    let comment = comment_repo::create_comment(&pool, current.user.id, post.id, body).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "id": comment.id,
        "user": current.user.username,
        "body": comment.body,
        "created_at": comment.created_at,
    })))
}

pub async fn delete_comment(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let post = load_post(&pool, post_id).await?;
    let comment = comment_repo::find_by_id_and_post(&pool, comment_id, post.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;

    if comment.user_id != current.user.id {
        return Err(AppError::Forbidden(
            "You do not have permission to delete this comment.".to_string(),
        ));
    }

    comment_repo::delete_comment(&pool, comment.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/posts/{id}/commentaries", web::get().to(list_comments))
        .route("/posts/{id}/commentaries", web::post().to(create_comment))
        .route(
            "/posts/{id}/commentaries/{comment_id}",
            web::delete().to(delete_comment),
        );
}
