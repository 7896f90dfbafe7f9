//! HTTP lookup service for idcheck.
//!
//! Provides endpoints for:
//! - NIN lookup (`POST /api/verify-nin`)
//! - Liveness (`GET /health`)
//! - Prometheus metrics (`GET /metrics`, when enabled)

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;

pub use error::RpcError;
pub use metrics::LookupMetrics;
pub use server::{RpcConfig, RpcServer};
