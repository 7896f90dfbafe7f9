//! Fundamental types for idcheck.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! the validated 11-digit identifiers and the immutable identity record.

pub mod error;
pub mod ids;
pub mod record;

pub use error::IdFormatError;
pub use ids::{is_valid_id, IdKind, PrimaryId, SecondaryId, ID_LEN};
pub use record::{PortraitRef, Record, Sex};
