use crate::models::{Blocked, BlockedUserEntry};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Create a block edge. Returns `None` when the edge already exists.
pub async fn create_block(
    pool: &PgPool,
    blocker_id: Uuid,
    blocked_id: Uuid,
) -> Result<Option<Blocked>, sqlx::Error> {
    let block = sqlx::query_as::<_, Blocked>(
        r#"
        INSERT INTO blocked (id, blocker_id, blocked_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (blocker_id, blocked_id) DO NOTHING
        RETURNING id, blocker_id, blocked_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(blocker_id)
    .bind(blocked_id)
    .fetch_optional(pool)
    .await?;

    Ok(block)
}

/// Remove a block edge. Returns false when there was none to remove.
pub async fn delete_block(
    pool: &PgPool,
    blocker_id: Uuid,
    blocked_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM blocked
        WHERE blocker_id = $1 AND blocked_id = $2
        "#,
    )
    .bind(blocker_id)
    .bind(blocked_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

pub async fn has_blocked(
    pool: &PgPool,
    blocker_id: Uuid,
    blocked_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM blocked WHERE blocker_id = $1 AND blocked_id = $2)",
    )
    .bind(blocker_id)
    .bind(blocked_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>(0))
}

/// Blocked users with usernames, newest edge first.
pub async fn list_blocked(
    pool: &PgPool,
    blocker_id: Uuid,
) -> Result<Vec<BlockedUserEntry>, sqlx::Error> {
    let entries = sqlx::query_as::<_, BlockedUserEntry>(
        r#"
        SELECT b.id, u.username AS blocked
        FROM blocked b
        JOIN users u ON u.id = b.blocked_id
        WHERE b.blocker_id = $1
        ORDER BY b.created_at DESC
        "#,
    )
    .bind(blocker_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
