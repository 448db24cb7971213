/// Account endpoints: registration, login, logout, current account.
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::services::auth;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 5))]
    pub password: Option<String>,
}

pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let user = auth::register(&pool, &req.username, &req.email, &req.password).await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(HttpResponse::Created().json(user))
}

pub async fn login(pool: web::Data<PgPool>, req: web::Json<LoginRequest>) -> Result<HttpResponse> {
    let token = auth::login(&pool, &req.username, &req.password).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "token": token })))
}

pub async fn logout(pool: web::Data<PgPool>, current: CurrentUser) -> Result<HttpResponse> {
    auth::logout(&pool, &current.token_hash).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "You have been logout successfully"
    })))
}

pub async fn me(current: CurrentUser) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(current.user))
}

pub async fn update_me(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if let Some(username) = req.username.as_deref() {
        if username != current.user.username && user_repo::username_taken(&pool, username).await? {
            return Err(AppError::Conflict("Username already taken.".to_string()));
        }
    }
    if let Some(email) = req.email.as_deref() {
        if email != current.user.email && user_repo::email_taken(&pool, email).await? {
            return Err(AppError::Conflict("Email already registered.".to_string()));
        }
    }

    let password_hash = match req.password.as_deref() {
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    let user = user_repo::update_user(
        &pool,
        current.user.id,
        req.username.as_deref(),
        req.email.as_deref(),
        password_hash.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(user))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/register", web::post().to(register))
        .route("/users/login", web::post().to(login))
        .route("/users/logout", web::post().to(logout))
        .route("/users/me", web::get().to(me))
        .route("/users/me", web::patch().to(update_me));
}
