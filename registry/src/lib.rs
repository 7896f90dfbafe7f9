//! Identity record sources.
//!
//! The lookup service depends only on the [`RecordSource`] trait. The record
//! set itself is reference data: built once, shared behind an `Arc`, never
//! mutated, so any number of concurrent lookups need no locking.

pub mod error;
pub mod file;
pub mod memory;
pub mod seed;
pub mod source;

pub use error::RegistryError;
pub use file::{load_records, parse_records};
pub use memory::StaticRegistry;
pub use seed::demo_records;
pub use source::RecordSource;
