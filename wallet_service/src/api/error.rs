use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;

use crate::domain::error::CoreError;

/// Unified error type for the HTTP surface.
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CoreError::AssetNotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            CoreError::WalletNotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            CoreError::InsufficientFunds { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            CoreError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
            CoreError::DuplicateIdempotencyRace => {
                tracing::error!("DuplicateIdempotencyRace escaped the transfer engine");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            CoreError::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}
