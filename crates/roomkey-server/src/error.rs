//! Error types for the server crate.

use crate::air_quality::AirQualityError;
use crate::room_service::RoomServiceError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roomkey_token::TokenError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by request handlers.
///
/// Every variant renders as `{"status": "error", "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Query or path parameters could not be read.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Token issuance failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The room API call failed.
    #[error(transparent)]
    RoomService(#[from] RoomServiceError),

    /// The air-quality lookup failed.
    #[error(transparent)]
    AirQuality(#[from] AirQualityError),

    /// Feature switched off in configuration.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Token(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RoomService(RoomServiceError::InvalidRoom) => StatusCode::BAD_REQUEST,
            ApiError::RoomService(RoomServiceError::Token(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RoomService(_) => StatusCode::BAD_GATEWAY,
            ApiError::AirQuality(AirQualityError::InvalidLocation) => StatusCode::BAD_REQUEST,
            ApiError::AirQuality(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Signing failures are server-side; keep details in the log.
            ApiError::Token(err) if !err.is_client_error() => {
                tracing::error!(error = %err, "Token signing failed");
                "token could not be issued".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(json!({ "status": "error", "message": message })),
        )
            .into_response()
    }
}

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration is incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] roomkey_core::ConfigError),

    /// Signing credentials were rejected.
    #[error("signer error: {0}")]
    Signer(#[from] TokenError),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),

    /// Failed to start the server.
    #[error("failed to start server: {0}")]
    StartupFailed(String),
}
