use crate::models::ScheduledPost;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    body: &str,
    publish_at: DateTime<Utc>,
) -> Result<ScheduledPost, sqlx::Error> {
    let scheduled = sqlx::query_as::<_, ScheduledPost>(
        r#"
        INSERT INTO scheduled_posts (id, owner_id, title, body, publish_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, owner_id, title, body, publish_at, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(title)
    .bind(body)
    .bind(publish_at)
    .fetch_one(pool)
    .await?;

    Ok(scheduled)
}

/// Queue entries due for publication, oldest first.
pub async fn list_due(
    pool: &PgPool,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<ScheduledPost>, sqlx::Error> {
    let due = sqlx::query_as::<_, ScheduledPost>(
        r#"
        SELECT id, owner_id, title, body, publish_at, created_at
        FROM scheduled_posts
        WHERE publish_at <= $1
        ORDER BY publish_at ASC
        LIMIT $2
        "#,
    )
    .bind(now)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(due)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM scheduled_posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}
