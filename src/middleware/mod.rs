pub mod auth;

pub use auth::{AuthMiddleware, CurrentUser, MaybeUser};
