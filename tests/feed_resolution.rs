/// Feed resolution properties, exercised on the pure ranking core.
use chrono::{Duration, TimeZone, Utc};
use social_api::models::{FeedCandidate, PrivacySetting};
use social_api::services::feed::rank_feed;
use std::collections::HashSet;
use uuid::Uuid;

struct Owner {
    id: Uuid,
    username: &'static str,
    privacy: PrivacySetting,
}

impl Owner {
    fn new(username: &'static str, privacy: PrivacySetting) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            privacy,
        }
    }

    /// A post by this owner, `age_minutes` old.
    fn post(&self, age_minutes: i64) -> FeedCandidate {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        FeedCandidate {
            post_id: Uuid::new_v4(),
            title: format!("{} post", self.username),
            image_post: None,
            owner_id: self.id,
            owner_username: self.username.to_string(),
            owner_privacy: self.privacy,
            created_at: base - Duration::minutes(age_minutes),
        }
    }
}

fn ids(set: &[&Owner]) -> HashSet<Uuid> {
    set.iter().map(|o| o.id).collect()
}

#[test]
fn anonymous_viewer_sees_public_posts_newest_first() {
    let public = Owner::new("public", PrivacySetting::Public);
    let private = Owner::new("private", PrivacySetting::Private);

    let candidates = vec![public.post(30), private.post(10), public.post(5)];
    let result = rank_feed(None, candidates, &HashSet::new(), &HashSet::new());

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|c| c.owner_id == public.id));
    assert!(result[0].created_at > result[1].created_at);
}

#[test]
fn anonymous_viewer_never_sees_private_owners() {
    let private = Owner::new("private", PrivacySetting::Private);
    let result = rank_feed(
        None,
        vec![private.post(1), private.post(2)],
        &HashSet::new(),
        &HashSet::new(),
    );
    assert!(result.is_empty());
}

#[test]
fn blocked_owner_never_appears_regardless_of_follow_or_privacy() {
    let viewer = Uuid::new_v4();
    let blocked_public = Owner::new("blocked_public", PrivacySetting::Public);
    let blocked_followed = Owner::new("blocked_followed", PrivacySetting::Private);

    let following = ids(&[&blocked_followed]);
    let blocked = ids(&[&blocked_public, &blocked_followed]);

    let result = rank_feed(
        Some(viewer),
        vec![blocked_public.post(1), blocked_followed.post(2)],
        &following,
        &blocked,
    );

    assert!(result.is_empty());
}

#[test]
fn private_owner_appears_iff_followed() {
    let viewer = Uuid::new_v4();
    let followed_private = Owner::new("followed_private", PrivacySetting::Private);
    let stranger_private = Owner::new("stranger_private", PrivacySetting::Private);

    let following = ids(&[&followed_private]);

    let result = rank_feed(
        Some(viewer),
        vec![followed_private.post(1), stranger_private.post(2)],
        &following,
        &HashSet::new(),
    );

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].owner_id, followed_private.id);
}

#[test]
fn followed_owners_rank_before_unfollowed_with_recency_tie_break() {
    let viewer = Uuid::new_v4();
    let followed = Owner::new("followed", PrivacySetting::Public);
    let stranger = Owner::new("stranger", PrivacySetting::Public);

    // The stranger's post is the newest overall but must still rank below
    // every followed post.
    let candidates = vec![
        stranger.post(1),
        followed.post(60),
        followed.post(10),
        stranger.post(90),
    ];

    let result = rank_feed(
        Some(viewer),
        candidates,
        &ids(&[&followed]),
        &HashSet::new(),
    );

    let owners: Vec<Uuid> = result.iter().map(|c| c.owner_id).collect();
    assert_eq!(
        owners,
        vec![followed.id, followed.id, stranger.id, stranger.id]
    );

    // Newest first within each tier.
    assert!(result[0].created_at > result[1].created_at);
    assert!(result[2].created_at > result[3].created_at);
}

/// Viewer A follows B (private) and blocks C (public); D is public and not
/// followed. Expected: B's posts first (newest first), then D's; C never
/// appears.
#[test]
fn follow_block_scenario() {
    let viewer = Uuid::new_v4();
    let b = Owner::new("b", PrivacySetting::Private);
    let c = Owner::new("c", PrivacySetting::Public);
    let d = Owner::new("d", PrivacySetting::Public);

    let candidates = vec![
        c.post(1),
        b.post(20),
        d.post(5),
        b.post(40),
        c.post(15),
        c.post(30),
    ];

    let result = rank_feed(Some(viewer), candidates, &ids(&[&b]), &ids(&[&c]));

    let owners: Vec<Uuid> = result.iter().map(|p| p.owner_id).collect();
    assert_eq!(owners, vec![b.id, b.id, d.id]);
    assert!(result[0].created_at > result[1].created_at);
}

#[test]
fn viewer_sees_own_private_posts_without_following_themselves() {
    let me = Owner::new("me", PrivacySetting::Private);

    let result = rank_feed(
        Some(me.id),
        vec![me.post(1)],
        &HashSet::new(),
        &HashSet::new(),
    );

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].owner_id, me.id);
}

#[test]
fn own_posts_rank_in_the_followed_tier() {
    let me = Owner::new("me", PrivacySetting::Public);
    let stranger = Owner::new("stranger", PrivacySetting::Public);

    let result = rank_feed(
        Some(me.id),
        vec![stranger.post(1), me.post(30)],
        &HashSet::new(),
        &HashSet::new(),
    );

    let owners: Vec<Uuid> = result.iter().map(|p| p.owner_id).collect();
    assert_eq!(owners, vec![me.id, stranger.id]);
}

#[test]
fn empty_candidate_set_yields_empty_feed() {
    let result = rank_feed(
        Some(Uuid::new_v4()),
        Vec::new(),
        &HashSet::new(),
        &HashSet::new(),
    );
    assert!(result.is_empty());
}
