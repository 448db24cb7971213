/// HTTP request handlers
///
/// One module per resource. Handlers take the pool and extractors, return
/// `Result<HttpResponse, AppError>`, and register their routes through a
/// per-module `configure` function mounted under `/api`.
use serde::Deserialize;

pub mod auth;
pub mod blocks;
pub mod comments;
pub mod follows;
pub mod health;
pub mod likes;
pub mod posts;
pub mod profiles;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// `?limit=&offset=` pagination with clamped defaults.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn pagination_is_clamped() {
        let p = Pagination {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 0);

        let p = Pagination {
            limit: Some(0),
            offset: Some(40),
        };
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 40);
    }
}
