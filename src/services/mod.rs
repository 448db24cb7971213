/// Business logic layer
pub mod auth;
pub mod feed;
pub mod media;
pub mod visibility;
