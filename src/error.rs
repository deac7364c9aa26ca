use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load private key from {path}: {reason}")]
    KeyLoad { path: String, reason: String },

    #[error("Failed to sign app assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Installation token exchange failed: {0}")]
    AuthExchange(String),

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid webhook signature")]
    InvalidSignature,
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            RelayError::InvalidSignature => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let label = match self {
            RelayError::InvalidPayload(_) => "invalid_payload",
            RelayError::InvalidSignature => "invalid_signature",
            _ => "error",
        };
        // Server-side failures can carry upstream URLs and ids; keep them in the log.
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };
        (
            status,
            Json(json!({
                "status": label,
                "error": message,
            })),
        )
            .into_response()
    }
}
