//! Unified error handling for the ops service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error for HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// A repository query failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Entity missing, or owned by another merchant - the two cases are
    /// deliberately indistinguishable to the client.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request from the client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Anything else that should not have happened.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Database(_) | Self::Internal(_) => {
                // Server faults go to Sentry; the client gets a generic
                // body, never SQL text or connection details.
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "request failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("vendor 42".to_string());
        assert_eq!(err.to_string(), "Not found: vendor 42");

        let err = AppError::BadRequest("invalid location filter".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid location filter");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let response = AppError::Internal("secret connection string".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
