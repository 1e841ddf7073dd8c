use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::service::{ErrorKind, ServiceError};

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let msg = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
            "internal server error".to_string()
        } else {
            tracing::debug!(status = %status, "request rejected: {}", self);
            self.to_string()
        };

        (status, Json(serde_json::json!({ "msg": msg }))).into_response()
    }
}
