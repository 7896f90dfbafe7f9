//! HTTP client for the idcheck lookup service.
//!
//! [`HttpLookupClient`] implements [`idcheck_flow::RecordLookup`] over the
//! `POST /api/verify-nin` contract, so a verification session can run against
//! a remote server exactly as it runs against an in-process registry.

pub mod error;
pub mod lookup;

pub use error::ClientError;
pub use lookup::{HttpLookupClient, VERIFY_NIN_PATH};
