//! Shared utilities for idcheck.

pub mod logging;

pub use logging::{init_logging, LogFormat};
