/// Feed resolution
///
/// Filtering and ranking run in SQL over the whole posts table
/// (`post_repo::list_feed_page`), so pagination applies after a complete
/// ordering. `rank_feed` is the pure, unit-testable statement of the same
/// predicate and ordering; it shares `viewer_may_see` with the per-item
/// gates, so bulk and single-item decisions cannot drift. The orchestration
/// wrapper loads one page and annotates it with grouped engagement counts
/// (two queries, not one per post).
use crate::db::{comment_repo, like_repo, post_repo};
use crate::models::FeedCandidate;
use crate::services::visibility::viewer_may_see;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// One feed item as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: Uuid,
    pub title: String,
    pub image_post: Option<String>,
    pub owner: String,
    pub likes_count: i64,
    pub commentaries_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Ranking tier: 1 for owners the viewer follows (and the viewer's own
/// posts), 0 otherwise. Self-follow edges are rejected at write time, so
/// the viewer's own posts earn the tier explicitly.
fn priority_of(viewer: Uuid, owner: Uuid, following: &HashSet<Uuid>) -> i32 {
    if owner == viewer || following.contains(&owner) {
        1
    } else {
        0
    }
}

/// Filter and order feed candidates for a viewer.
///
/// Anonymous viewers get public-owner posts, newest first. Authenticated
/// viewers get the candidates passing `viewer_may_see`, ordered by priority
/// tier descending and then by creation time descending within each tier.
/// An empty candidate set yields an empty feed, never an error.
pub fn rank_feed(
    viewer: Option<Uuid>,
    candidates: Vec<FeedCandidate>,
    following: &HashSet<Uuid>,
    blocked: &HashSet<Uuid>,
) -> Vec<FeedCandidate> {
    let mut visible: Vec<FeedCandidate> = candidates
        .into_iter()
        .filter(|c| {
            viewer_may_see(
                viewer,
                c.owner_id,
                c.owner_privacy,
                following.contains(&c.owner_id),
                blocked.contains(&c.owner_id),
            )
        })
        .collect();

    match viewer {
        None => {
            visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Some(viewer) => {
            visible.sort_by(|a, b| {
                let pa = priority_of(viewer, a.owner_id, following);
                let pb = priority_of(viewer, b.owner_id, following);
                pb.cmp(&pa).then_with(|| b.created_at.cmp(&a.created_at))
            });
        }
    }

    visible
}

/// Resolve one feed page for a viewer and annotate it with like and
/// comment counts. Read-only.
pub async fn resolve_feed(
    pool: &PgPool,
    viewer: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedPost>, sqlx::Error> {
    let page = post_repo::list_feed_page(pool, viewer, limit, offset).await?;

    if page.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<Uuid> = page.iter().map(|c| c.post_id).collect();
    let likes: HashMap<Uuid, i64> = like_repo::count_by_posts(pool, &post_ids)
        .await?
        .into_iter()
        .collect();
    let comments: HashMap<Uuid, i64> = comment_repo::count_by_posts(pool, &post_ids)
        .await?
        .into_iter()
        .collect();

    Ok(page
        .into_iter()
        .map(|c| FeedPost {
            id: c.post_id,
            title: c.title,
            image_post: c.image_post,
            owner: c.owner_username,
            likes_count: likes.get(&c.post_id).copied().unwrap_or(0),
            commentaries_count: comments.get(&c.post_id).copied().unwrap_or(0),
            created_at: c.created_at,
        })
        .collect())
}
