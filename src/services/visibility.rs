/// Per-item access gates
///
/// The feed resolver and the single-item endpoints (detail, likes,
/// commentaries) must reach identical allow/deny decisions for the same
/// (viewer, owner) pair, so both go through `viewer_may_see`. The gates
/// load the relationship facts from the store; the resolver supplies them
/// from its precomputed sets.
use crate::db::{block_repo, follow_repo, profile_repo};
use crate::error::AppError;
use crate::models::PrivacySetting;
use sqlx::PgPool;
use uuid::Uuid;

/// Whether a viewer may see posts by `owner`.
///
/// Rules, in order: owners always see their own posts; a blocked owner is
/// never visible regardless of follow status or privacy; otherwise public
/// owners are visible to everyone and private owners only to followers.
/// Anonymous viewers see public owners only.
pub fn viewer_may_see(
    viewer: Option<Uuid>,
    owner: Uuid,
    owner_privacy: PrivacySetting,
    viewer_follows_owner: bool,
    viewer_blocked_owner: bool,
) -> bool {
    match viewer {
        None => owner_privacy == PrivacySetting::Public,
        Some(viewer) => {
            if viewer == owner {
                return true;
            }
            if viewer_blocked_owner {
                return false;
            }
            owner_privacy == PrivacySetting::Public || viewer_follows_owner
        }
    }
}

/// Load the relationship facts for one (viewer, owner) pair and evaluate
/// the shared predicate.
async fn viewer_may_see_owner(
    pool: &PgPool,
    viewer: Uuid,
    owner: Uuid,
) -> Result<bool, sqlx::Error> {
    if viewer == owner {
        return Ok(true);
    }

    let privacy = profile_repo::privacy_of(pool, owner).await?;
    let follows = follow_repo::is_following(pool, viewer, owner).await?;
    let blocked = block_repo::has_blocked(pool, viewer, owner).await?;

    Ok(viewer_may_see(Some(viewer), owner, privacy, follows, blocked))
}

/// Gate for viewing a post's detail, likes, or comment list.
pub async fn check_can_view(pool: &PgPool, viewer: Uuid, owner: Uuid) -> Result<(), AppError> {
    if viewer_may_see_owner(pool, viewer, owner).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to view this post.".to_string(),
        ))
    }
}

/// Gate for liking a post. Same decision as `check_can_view`.
pub async fn check_can_like(pool: &PgPool, viewer: Uuid, owner: Uuid) -> Result<(), AppError> {
    if viewer_may_see_owner(pool, viewer, owner).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to like this post.".to_string(),
        ))
    }
}

/// Gate for commenting on a post. Same decision as `check_can_view`.
pub async fn check_can_comment(pool: &PgPool, viewer: Uuid, owner: Uuid) -> Result<(), AppError> {
    if viewer_may_see_owner(pool, viewer, owner).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to comment on this post.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_sees_public_only() {
        let owner = Uuid::new_v4();
        assert!(viewer_may_see(None, owner, PrivacySetting::Public, false, false));
        assert!(!viewer_may_see(None, owner, PrivacySetting::Private, false, false));
    }

    #[test]
    fn block_overrides_follow() {
        let viewer = Uuid::new_v4();
        let owner = Uuid::new_v4();
        assert!(!viewer_may_see(
            Some(viewer),
            owner,
            PrivacySetting::Public,
            true,
            true
        ));
    }

    #[test]
    fn private_owner_visible_iff_followed() {
        let viewer = Uuid::new_v4();
        let owner = Uuid::new_v4();
        assert!(viewer_may_see(
            Some(viewer),
            owner,
            PrivacySetting::Private,
            true,
            false
        ));
        assert!(!viewer_may_see(
            Some(viewer),
            owner,
            PrivacySetting::Private,
            false,
            false
        ));
    }

    #[test]
    fn owner_always_sees_own_posts() {
        let owner = Uuid::new_v4();
        assert!(viewer_may_see(
            Some(owner),
            owner,
            PrivacySetting::Private,
            false,
            false
        ));
    }
}
