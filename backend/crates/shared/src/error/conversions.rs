//! Error conversions - HTTP rendering and extractor rejections
//!
//! Everything here is gated behind the `axum` feature so that crates
//! without an HTTP surface do not pull in the framework.

#[cfg(feature = "axum")]
use super::app_error::AppError;
#[cfg(feature = "axum")]
use super::kind::ErrorKind;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.to_body())).into_response()
    }
}

/// Body rejected by `axum::Json` before reaching a handler
#[cfg(feature = "axum")]
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        use axum::extract::rejection::JsonRejection;

        let kind = match &rejection {
            JsonRejection::MissingJsonContentType(_) => ErrorKind::UnsupportedMediaType,
            JsonRejection::JsonDataError(_) => ErrorKind::UnprocessableEntity,
            _ => ErrorKind::BadRequest,
        };
        AppError::new(kind, rejection.body_text())
    }
}
