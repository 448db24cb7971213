/// Error types for the social API
///
/// Every handler returns `Result<HttpResponse, AppError>`; the
/// `ResponseError` impl converts failures into JSON error responses.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Duplicate edge, self-directed edge, or other "already exists" state.
    /// Reported as 400 with a descriptive message, matching the API contract.
    #[error("{0}")]
    Conflict(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Request payload failed validation
    #[error("{0}")]
    Validation(String),

    /// Malformed request (bad ids, bad query params, bad upload)
    #[error("{0}")]
    BadRequest(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Anything else that should never reach the client verbatim
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let error_msg = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found.".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Resource already exists.".to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_reported_as_bad_request() {
        let err = AppError::Conflict("You have already liked this post.".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::NotFound("Post not found.".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("nope".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Unauthorized("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn client_facing_message_is_unprefixed() {
        let err = AppError::Conflict("You can not block yourself.".to_string());
        assert_eq!(err.to_string(), "You can not block yourself.");
    }
}
