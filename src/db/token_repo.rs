use crate::models::{AuthToken, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Store the digest of a freshly minted bearer token.
pub async fn create_token(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &str,
) -> Result<AuthToken, sqlx::Error> {
    let token = sqlx::query_as::<_, AuthToken>(
        r#"
        INSERT INTO auth_tokens (id, user_id, token_hash)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, token_hash, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(token_hash)
    .fetch_one(pool)
    .await?;

    Ok(token)
}

/// Resolve a token digest to its user, if the token is live.
pub async fn get_user_by_token_hash(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.email, u.password_hash, u.is_staff, u.created_at
        FROM users u
        JOIN auth_tokens t ON t.user_id = u.id
        WHERE t.token_hash = $1
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Revoke the presenting token. Returns false when it was already gone.
pub async fn delete_token(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM auth_tokens
        WHERE token_hash = $1
        "#,
    )
    .bind(token_hash)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}
