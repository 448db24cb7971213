/// Scheduled post publisher
///
/// Drains the `scheduled_posts` queue on a fixed interval: due rows are
/// inserted into `posts` with `created_at = publish_at` (a late cycle does
/// not reorder the feed) and the queue row is deleted afterwards.
/// Insert-before-delete gives at-least-once publication; a crash between
/// the two steps republishes on the next cycle rather than losing the post.
use crate::db::{post_repo, scheduled_post_repo};
use chrono::Utc;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Rows published per cycle.
const BATCH_SIZE: i64 = 100;

pub async fn start_scheduled_post_publisher(pool: PgPool, interval_secs: u64) {
    let interval = Duration::from_secs(interval_secs);
    tracing::info!(
        interval_secs,
        "Starting scheduled post publisher background job"
    );

    loop {
        sleep(interval).await;

        let cycle_start = Instant::now();
        match publish_due_posts(&pool).await {
            Ok(0) => {}
            Ok(published) => {
                tracing::info!(
                    published,
                    duration_ms = cycle_start.elapsed().as_millis() as u64,
                    "Scheduled post publish cycle completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    duration_ms = cycle_start.elapsed().as_millis() as u64,
                    "Scheduled post publish cycle failed"
                );
            }
        }
    }
}

async fn publish_due_posts(pool: &PgPool) -> Result<usize, sqlx::Error> {
    let due = scheduled_post_repo::list_due(pool, Utc::now(), BATCH_SIZE).await?;
    let mut published = 0;

    for scheduled in due {
        post_repo::create_post_at(
            pool,
            scheduled.owner_id,
            &scheduled.title,
            &scheduled.body,
            scheduled.publish_at,
        )
        .await?;
        scheduled_post_repo::delete(pool, scheduled.id).await?;
        published += 1;
    }

    Ok(published)
}
