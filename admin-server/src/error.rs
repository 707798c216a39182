//! API error type.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use studio_directory::Error as DirectoryError;

/// Errors returned by admin API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Directory(e) => match e {
                DirectoryError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                DirectoryError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
                DirectoryError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
                DirectoryError::Backend(_) => (StatusCode::BAD_GATEWAY, "backend_error"),
                DirectoryError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "serialization_error"),
                DirectoryError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
                DirectoryError::PasswordHash(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        // Backend details stay in the logs; the dashboard shows a generic notice.
        let message = if status.is_server_error() {
            "The operation failed, please try again".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
