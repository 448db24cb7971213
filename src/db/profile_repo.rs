use crate::models::{PrivacySetting, Profile, ProfileCounts};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn get_by_user_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, user_id, description, image_profile, privacy_setting, created_at
        FROM profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Lazily create the profile row on first write.
pub async fn get_or_create(pool: &PgPool, user_id: Uuid) -> Result<Profile, sqlx::Error> {
    let inserted = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING id, user_id, description, image_profile, privacy_setting, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(profile) => Ok(profile),
        None => get_by_user_id(pool, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound),
    }
}

/// Partial update; absent fields keep their current value.
pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    description: Option<&str>,
    privacy_setting: Option<PrivacySetting>,
) -> Result<Profile, sqlx::Error> {
    get_or_create(pool, user_id).await?;

    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET description = COALESCE($2, description),
            privacy_setting = COALESCE($3, privacy_setting)
        WHERE user_id = $1
        RETURNING id, user_id, description, image_profile, privacy_setting, created_at
        "#,
    )
    .bind(user_id)
    .bind(description)
    .bind(privacy_setting)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

pub async fn set_image(
    pool: &PgPool,
    user_id: Uuid,
    image_path: &str,
) -> Result<Profile, sqlx::Error> {
    get_or_create(pool, user_id).await?;

    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET image_profile = $2
        WHERE user_id = $1
        RETURNING id, user_id, description, image_profile, privacy_setting, created_at
        "#,
    )
    .bind(user_id)
    .bind(image_path)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

/// Privacy of an owner; users without a profile row read as public.
pub async fn privacy_of(pool: &PgPool, user_id: Uuid) -> Result<PrivacySetting, sqlx::Error> {
    let privacy = sqlx::query_scalar::<_, PrivacySetting>(
        r#"
        SELECT COALESCE(
            (SELECT privacy_setting FROM profiles WHERE user_id = $1),
            'public'
        )
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(privacy)
}

/// Follower/following/liked/blocked counters shown on profile pages.
pub async fn counts_for_user(pool: &PgPool, user_id: Uuid) -> Result<ProfileCounts, sqlx::Error> {
    let counts = sqlx::query_as::<_, ProfileCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM followers WHERE follower_id = $1) AS following,
            (SELECT COUNT(*) FROM followers WHERE following_id = $1) AS followers,
            (SELECT COUNT(*) FROM likes WHERE user_id = $1) AS liked,
            (SELECT COUNT(*) FROM blocked WHERE blocker_id = $1) AS blocked
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(counts)
}
