use crate::models::Follower;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Create a follow edge. Returns `None` when the edge already exists.
pub async fn create_follow(
    pool: &PgPool,
    follower_id: Uuid,
    following_id: Uuid,
) -> Result<Option<Follower>, sqlx::Error> {
    let follow = sqlx::query_as::<_, Follower>(
        r#"
        INSERT INTO followers (id, follower_id, following_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (follower_id, following_id) DO NOTHING
        RETURNING id, follower_id, following_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(follower_id)
    .bind(following_id)
    .fetch_optional(pool)
    .await?;

    Ok(follow)
}

/// Remove a follow edge. Returns false when there was none to remove.
pub async fn delete_follow(
    pool: &PgPool,
    follower_id: Uuid,
    following_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM followers
        WHERE follower_id = $1 AND following_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

pub async fn is_following(
    pool: &PgPool,
    follower_id: Uuid,
    following_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM followers WHERE follower_id = $1 AND following_id = $2)",
    )
    .bind(follower_id)
    .bind(following_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>(0))
}

/// Usernames of the user's followers, newest edge first.
pub async fn follower_usernames(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
    let usernames = sqlx::query_scalar::<_, String>(
        r#"
        SELECT u.username
        FROM followers f
        JOIN users u ON u.id = f.follower_id
        WHERE f.following_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(usernames)
}

/// Usernames the user follows, newest edge first.
pub async fn following_usernames(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
    let usernames = sqlx::query_scalar::<_, String>(
        r#"
        SELECT u.username
        FROM followers f
        JOIN users u ON u.id = f.following_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(usernames)
}
