//! RPC error types.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::handlers::FailureResponse;

/// Message for any NIN that is not exactly 11 digits.
pub const INVALID_NIN_MESSAGE: &str = "Invalid NIN format. Must be 11 digits.";
/// Message for a well-formed NIN with no record.
pub const NOT_FOUND_MESSAGE: &str = "No user found with this NIN.";
/// Message for anything unexpected.
pub const INTERNAL_MESSAGE: &str = "An error occurred while verifying NIN.";

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::InvalidRequest(message) | Self::NotFound(message) => message,
            other => {
                tracing::error!("Error verifying NIN: {other}");
                INTERNAL_MESSAGE.to_string()
            }
        };
        (status, Json(FailureResponse::new(message))).into_response()
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
}
