//! Nullable infrastructure for deterministic testing.
//!
//! Everything the verification flow talks to (the lookup backend, the device
//! credential prompt) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return scripted answers
//! - Record every call for assertions
//! - Never touch the network or a real device
//!
//! Usage: swap real implementations for nullables in tests.

pub mod credential;
pub mod lookup;

pub use credential::NullCredentialPlatform;
pub use lookup::NullLookup;
