use crate::models::{FeedCandidate, Post, PostWithOwner};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_post(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    body: &str,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, owner_id, title, body)
        VALUES ($1, $2, $3, $4)
        RETURNING id, owner_id, title, body, image_post, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(title)
    .bind(body)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Insert with an explicit timestamp. Used by the scheduled post publisher
/// so feed ordering follows the requested publish time.
pub async fn create_post_at(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    body: &str,
    created_at: DateTime<Utc>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, owner_id, title, body, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, owner_id, title, body, image_post, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(title)
    .bind(body)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

pub async fn find_post_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, owner_id, title, body, image_post, created_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

pub async fn find_with_owner(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<PostWithOwner>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostWithOwner>(
        r#"
        SELECT p.id, p.owner_id, p.title, p.body, p.image_post,
               u.username AS owner, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.owner_id
        WHERE p.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Partial update; absent fields keep their current value.
pub async fn update_post(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    body: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = COALESCE($2, title),
            body = COALESCE($3, body)
        WHERE id = $1
        RETURNING id, owner_id, title, body, image_post, created_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(body)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

pub async fn delete_post(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

pub async fn set_image(pool: &PgPool, id: Uuid, image_path: &str) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET image_post = $2
        WHERE id = $1
        RETURNING id, owner_id, title, body, image_post, created_at
        "#,
    )
    .bind(id)
    .bind(image_path)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// One page of the resolved feed. Visibility filtering and the
/// `(priority DESC, created_at DESC)` ordering run in SQL over the whole
/// posts table, so pagination applies after a complete ordering. The
/// predicate and ordering mirror `services::feed::rank_feed` exactly;
/// owners without a profile row read as public, and the id is a
/// deterministic tie-break.
pub async fn list_feed_page(
    pool: &PgPool,
    viewer: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedCandidate>, sqlx::Error> {
    let page = match viewer {
        None => {
            sqlx::query_as::<_, FeedCandidate>(
                r#"
                SELECT p.id AS post_id, p.title, p.image_post, p.owner_id,
                       u.username AS owner_username,
                       COALESCE(pr.privacy_setting, 'public') AS owner_privacy,
                       p.created_at
                FROM posts p
                JOIN users u ON u.id = p.owner_id
                LEFT JOIN profiles pr ON pr.user_id = p.owner_id
                WHERE COALESCE(pr.privacy_setting, 'public') = 'public'
                ORDER BY p.created_at DESC, p.id DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        Some(viewer) => {
            sqlx::query_as::<_, FeedCandidate>(
                r#"
                SELECT p.id AS post_id, p.title, p.image_post, p.owner_id,
                       u.username AS owner_username,
                       COALESCE(pr.privacy_setting, 'public') AS owner_privacy,
                       p.created_at,
                       CASE WHEN p.owner_id = $1 OR EXISTS (
                                SELECT 1 FROM followers f
                                WHERE f.follower_id = $1 AND f.following_id = p.owner_id
                            )
                            THEN 1 ELSE 0
                       END AS priority
                FROM posts p
                JOIN users u ON u.id = p.owner_id
                LEFT JOIN profiles pr ON pr.user_id = p.owner_id
                WHERE NOT EXISTS (
                          SELECT 1 FROM blocked b
                          WHERE b.blocker_id = $1 AND b.blocked_id = p.owner_id
                      )
                  AND (
                          p.owner_id = $1
                          OR COALESCE(pr.privacy_setting, 'public') = 'public'
                          OR EXISTS (
                                 SELECT 1 FROM followers f
                                 WHERE f.follower_id = $1 AND f.following_id = p.owner_id
                             )
                      )
                ORDER BY priority DESC, p.created_at DESC, p.id DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(viewer)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(page)
}
