use crate::models::{Like, LikeWithUser, LikedPostEntry};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a like. Returns `None` when the user already liked the post.
pub async fn create_like(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<Option<Like>, sqlx::Error> {
    let like = sqlx::query_as::<_, Like>(
        r#"
        INSERT INTO likes (id, user_id, post_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, post_id) DO NOTHING
        RETURNING id, user_id, post_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(like)
}

/// Remove a like. Returns false when there was none to remove.
pub async fn delete_like(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE user_id = $1 AND post_id = $2
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Users who liked a post, newest like first.
pub async fn list_for_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<LikeWithUser>, sqlx::Error> {
    let likes = sqlx::query_as::<_, LikeWithUser>(
        r#"
        SELECT l.id, u.username AS "user"
        FROM likes l
        JOIN users u ON u.id = l.user_id
        WHERE l.post_id = $1
        ORDER BY l.created_at DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(likes)
}

/// Posts the user liked, newest like first.
pub async fn list_liked_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<LikedPostEntry>, sqlx::Error> {
    let liked = sqlx::query_as::<_, LikedPostEntry>(
        r#"
        SELECT l.id, p.title AS post, l.created_at
        FROM likes l
        JOIN posts p ON p.id = l.post_id
        WHERE l.user_id = $1
        ORDER BY l.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(liked)
}

/// Like counts grouped by post for one feed page.
pub async fn count_by_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
    let counts = sqlx::query_as::<_, (Uuid, i64)>(
        r#"
        SELECT post_id, COUNT(*)
        FROM likes
        WHERE post_id = ANY($1)
        GROUP BY post_id
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    Ok(counts)
}
