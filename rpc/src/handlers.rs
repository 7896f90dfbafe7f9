//! RPC request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use idcheck_types::{PrimaryId, Record};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{panic_message, RpcError, INVALID_NIN_MESSAGE, NOT_FOUND_MESSAGE};
use crate::metrics::LookupOutcome;
use crate::server::AppState;

// ── Lookup ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyNinRequest {
    #[serde(default, alias = "primaryId")]
    pub nin: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyNinResponse {
    pub success: bool,
    pub user: Record,
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// `POST /api/verify-nin`
///
/// The NIN is validated here regardless of what the caller already checked;
/// a malformed or missing NIN is a bad request, never "not found".
pub async fn verify_nin(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyNinRequest>, JsonRejection>,
) -> Result<Json<VerifyNinResponse>, RpcError> {
    let started = Instant::now();
    let result = lookup(&state, payload).await;
    let outcome = match &result {
        Ok(_) => LookupOutcome::Found,
        Err(RpcError::NotFound(_)) => LookupOutcome::NotFound,
        Err(RpcError::InvalidRequest(_)) => LookupOutcome::BadRequest,
        Err(_) => LookupOutcome::Error,
    };
    state.metrics.observe(outcome, started.elapsed());
    result
}

async fn lookup(
    state: &AppState,
    payload: Result<Json<VerifyNinRequest>, JsonRejection>,
) -> Result<Json<VerifyNinResponse>, RpcError> {
    let raw = match payload {
        Ok(Json(VerifyNinRequest { nin: Some(nin) })) => nin,
        Ok(_) => return Err(RpcError::InvalidRequest(INVALID_NIN_MESSAGE.into())),
        Err(rejection) => {
            tracing::debug!("rejected lookup body: {rejection}");
            return Err(RpcError::InvalidRequest(INVALID_NIN_MESSAGE.into()));
        }
    };
    let id = PrimaryId::parse(&raw)
        .map_err(|_| RpcError::InvalidRequest(INVALID_NIN_MESSAGE.into()))?;

    if !state.simulated_latency.is_zero() {
        tokio::time::sleep(state.simulated_latency).await;
    }

    // Source failures become a counted 500.
    let found = panic::catch_unwind(AssertUnwindSafe(|| state.source.find_by_primary_id(&id)))
        .map_err(|payload| {
            RpcError::Server(format!("record source failed: {}", panic_message(&*payload)))
        })?;

    match found {
        Some(user) => {
            tracing::debug!("NIN lookup hit");
            Ok(Json(VerifyNinResponse {
                success: true,
                user,
            }))
        }
        None => {
            tracing::debug!("NIN lookup miss");
            Err(RpcError::NotFound(NOT_FOUND_MESSAGE.into()))
        }
    }
}

// ── Health ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: usize,
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: state.source.len(),
    })
}

// ── Metrics ──────────────────────────────────────────────────────────────

/// `GET /metrics` in the Prometheus text exposition format.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&state.metrics.registry.gather(), &mut buf) {
        return RpcError::Server(format!("metrics encoding failed: {e}")).into_response();
    }
    (
        StatusCode::OK,
        [(CONTENT_TYPE, encoder.format_type().to_string())],
        buf,
    )
        .into_response()
}
