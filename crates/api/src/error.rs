//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use petfile_core::image::ImageError;
use petfile_shared::AppError;
use serde::Serialize;

/// Error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable category, e.g. `NOT_FOUND`.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Invalid request that never reached the image service.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self(AppError::InvalidArgument(msg.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        Self(AppError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.0.error_code(),
            message: self.0.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
