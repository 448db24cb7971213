/// Background jobs owned by the binary
pub mod scheduled_posts;
