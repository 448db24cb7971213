/// Database access layer
///
/// Free async functions over `&PgPool`, one module per aggregate. Inserts
/// that can collide with a unique constraint use `ON CONFLICT DO NOTHING ...
/// RETURNING` and report the duplicate through an `Option`, so the
/// constraint stays authoritative even when a pre-check races.
pub mod block_repo;
pub mod comment_repo;
pub mod follow_repo;
pub mod like_repo;
pub mod post_repo;
pub mod profile_repo;
pub mod scheduled_post_repo;
pub mod token_repo;
pub mod user_repo;
