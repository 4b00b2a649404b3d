//! HTTP mapping for API errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rolo_core::ApiError;
use serde_json::json;
use tracing::error;

/// Newtype carrying an [`ApiError`] into an HTTP response.
///
/// Responses use the shape `{"error": "..."}`. Internal errors are
/// logged with their detail and returned with a generic message.
pub struct ApiFailure(pub ApiError);

impl From<ApiError> for ApiFailure {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self.0 {
            error!(detail = %detail, "internal error");
        }
        let status = StatusCode::from_u16(self.0.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.0.client_message() }))).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
