/// Social API Library
///
/// A social platform backend: profiles, posts, likes, commentaries,
/// follows, and blocks over PostgreSQL, with feed resolution that composes
/// privacy settings, follow edges, and block edges into one ranked listing.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: database entities and joined projections
/// - `services`: business logic (feed resolution, access gates, auth, media)
/// - `db`: repository functions over the connection pool
/// - `middleware`: bearer token authentication
/// - `jobs`: background jobs owned by the binary
/// - `error`: error types and HTTP mapping
/// - `config`: environment-backed configuration
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
