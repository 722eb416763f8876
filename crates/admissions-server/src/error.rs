use admissions_core::AdmissionsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Admissions(#[from] AdmissionsError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Admissions(e) => match e {
                AdmissionsError::Validation(_) => StatusCode::BAD_REQUEST,
                AdmissionsError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                AdmissionsError::NotFound(_) => StatusCode::NOT_FOUND,
                AdmissionsError::Conflict(_) => StatusCode::CONFLICT,
                AdmissionsError::StorageTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
                AdmissionsError::Storage(_) | AdmissionsError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client. Server-side failures are replaced by a
    /// generic message; the detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self.status() {
            StatusCode::SERVICE_UNAVAILABLE => "Database is busy, try again later".into(),
            status if status.is_server_error() => "Internal server error".into(),
            _ => self.to_string(),
        }
    }
}

impl From<admissions_core::auth::HashError> for ApiError {
    fn from(e: admissions_core::auth::HashError) -> Self {
        ApiError::Admissions(e.into())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ApiError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        ApiError::Internal("Database handle poisoned".into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }

        let body = Json(json!({
            "status": "error",
            "message": self.public_message(),
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
