use crate::models::{CommentWithAuthor, Commentary};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_comment(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
    body: &str,
) -> Result<Commentary, sqlx::Error> {
    let comment = sqlx::query_as::<_, Commentary>(
        r#"
        INSERT INTO commentaries (id, user_id, post_id, body)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, post_id, body, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(post_id)
    .bind(body)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Look up a comment under a specific post, so a comment id from another
/// post cannot be deleted through the wrong route.
pub async fn find_by_id_and_post(
    pool: &PgPool,
    comment_id: Uuid,
    post_id: Uuid,
) -> Result<Option<Commentary>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Commentary>(
        r#"
        SELECT id, user_id, post_id, body, created_at
        FROM commentaries
        WHERE id = $1 AND post_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

pub async fn delete_comment(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM commentaries
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Comments under a post with author usernames, newest first.
pub async fn list_for_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, u.username AS "user", c.body, c.created_at
        FROM commentaries c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Comment counts grouped by post for one feed page.
pub async fn count_by_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
    let counts = sqlx::query_as::<_, (Uuid, i64)>(
        r#"
        SELECT post_id, COUNT(*)
        FROM commentaries
        WHERE post_id = ANY($1)
        GROUP BY post_id
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    Ok(counts)
}
