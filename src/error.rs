//! # error
//!
//! Centralised application error type.
//!
//! Both engines and every handler return `Result<_, AppError>`.  Axum's
//! `IntoResponse` impl converts these into structured JSON error bodies so the
//! front-end always gets a machine-readable response even on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing, non-positive or not a finite number.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operation references a symbol with no open position.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A snapshot comparison was requested but no snapshot exists.
    #[error("No data: {0}")]
    NoData(String),

    /// A persisted snapshot still lacks required fields after normalization.
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// Store I/O or (de)serialization failure.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::NoData(_) => StatusCode::NOT_FOUND,
            AppError::MalformedData(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::NoData(msg)
            | AppError::MalformedData(msg) => msg.clone(),
            AppError::Internal(err) => format!("Internal error: {err:#}"),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        }

        let body = Json(json!({
            "ok":    false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NoData("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::MalformedData("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("disk")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
