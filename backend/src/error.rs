//! # Error Handling
//!
//! [`AppError`] is the single error type returned by the backend's handlers.
//! It maps onto HTTP status codes and renders as the shared
//! [`ErrorResponse`] body:
//!
//! | Variant                                  | Status |
//! |------------------------------------------|--------|
//! | [`InvalidInput`](AppError::InvalidInput) | 400    |
//! | [`RateLimited`](AppError::RateLimited)   | 429    |
//! | [`Unavailable`](AppError::Unavailable)   | 503    |
//! | [`Config`](AppError::Config) / [`Internal`](AppError::Internal) | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::dto::chat::ErrorResponse;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned when the assistant cannot produce a reply.
pub const UNAVAILABLE_MESSAGE: &str =
    "Our chat system is currently unavailable. Please try again later.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client sent something unusable. The message is shown to the client.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Per-client request budget exhausted. Carries the client key.
    #[error("Rate limit exceeded for {0}")]
    RateLimited(String),

    /// Assistant failed or had nothing to say. The message is shown to the client.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn unavailable() -> Self {
        AppError::Unavailable(UNAVAILABLE_MESSAGE.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::Unavailable(msg) => msg.clone(),
            AppError::RateLimited(_) => "Too many requests. Please try again later.".to_string(),
            AppError::Config(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::RateLimited(_) => "RateLimited",
            AppError::Unavailable(_) => "Unavailable",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.user_message(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateLimited("1.2.3.4".into()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(AppError::unavailable().status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            AppError::Config("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Internal("provider key rejected".into());
        assert_eq!(err.user_message(), "An internal error occurred");

        let err = AppError::RateLimited("10.0.0.1".into());
        assert!(!err.user_message().contains("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::unavailable().into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, UNAVAILABLE_MESSAGE);
        assert_eq!(parsed.code, "Unavailable");
    }
}
