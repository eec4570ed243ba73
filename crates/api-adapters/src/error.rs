//! Maps domain failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domains::DomainError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("metrics encoding failed")]
    Metrics(#[from] std::fmt::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(DomainError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            ApiError::Domain(DomainError::NotFound(..)) => StatusCode::NOT_FOUND,
            ApiError::Domain(DomainError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Domain(DomainError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Domain(DomainError::Internal(_)) | ApiError::Render(_) | ApiError::Metrics(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                error!(error = %self, "request failed");
                "internal server error".to_string()
            }
            StatusCode::UNAUTHORIZED => "sign in required".to_string(),
            _ => self.to_string(),
        };
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
