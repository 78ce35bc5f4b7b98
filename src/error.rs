// SPDX-License-Identifier: Apache-2.0
//! Error types for the chat API

use crate::{store::StoreError, validator::ValidationError};
use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Application error types
///
/// The `Display` text is what clients see; sources stay in the logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request body")]
    MalformedPayload(#[from] JsonRejection),

    #[error("Too many requests")]
    RateLimited { retry_after: Duration },

    #[error("Failed to fetch messages")]
    FetchFailed(#[source] StoreError),

    #[error("Failed to send message")]
    SendFailed(#[source] StoreError),

    #[error("Failed to render metrics")]
    Metrics(#[from] prometheus::Error),

    #[error("Not found")]
    NotFound,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::FetchFailed(_) | AppError::SendFailed(_) | AppError::Metrics(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::FetchFailed(source) | AppError::SendFailed(source) => {
                error!(error = %source, "{}", self);
            }
            AppError::Metrics(source) => error!(error = %source, "{}", self),
            AppError::MalformedPayload(rejection) => {
                info!(detail = %rejection.body_text(), "Rejected request body");
            }
            _ => {}
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        match self {
            AppError::RateLimited { retry_after } => {
                // Round up so clients never retry early
                let secs = retry_after
                    .as_secs()
                    .saturating_add(u64::from(retry_after.subsec_nanos() > 0));
                (status, [(header::RETRY_AFTER, secs.to_string())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation(ValidationError::MissingField("author")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateLimited {
                retry_after: Duration::from_secs(1)
            }
            .status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::SendFailed(StoreError::Missing("messages")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_detail_not_exposed() {
        let err = AppError::FetchFailed(StoreError::Missing("messages"));
        assert_eq!(err.to_string(), "Failed to fetch messages");
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let response = AppError::RateLimited {
            retry_after: Duration::from_millis(1500),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
    }

    #[test]
    fn test_retry_after_saturates() {
        let response = AppError::RateLimited {
            retry_after: Duration::new(u64::MAX, 1),
        }
        .into_response();

        assert_eq!(response.headers()[header::RETRY_AFTER], u64::MAX.to_string());
    }
}
