//! The state machine's view of the record lookup service.

use async_trait::async_trait;
use idcheck_registry::RecordSource;
use idcheck_types::{PrimaryId, Record};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a lookup could not produce an answer. "Not found" is not an error: it
/// is `Ok(None)`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("server answered {status}: {message}")]
    Server { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Resolves a primary id to a record.
#[async_trait]
pub trait RecordLookup: Send + Sync {
    async fn find_by_primary_id(&self, id: &PrimaryId) -> Result<Option<Record>, LookupError>;
}

#[async_trait]
impl<L: RecordLookup + ?Sized> RecordLookup for Arc<L> {
    async fn find_by_primary_id(&self, id: &PrimaryId) -> Result<Option<Record>, LookupError> {
        (**self).find_by_primary_id(id).await
    }
}

/// Answers lookups straight from a [`RecordSource`] in the same process.
pub struct InProcessLookup<S> {
    source: S,
}

impl<S: RecordSource> InProcessLookup<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: RecordSource> RecordLookup for InProcessLookup<S> {
    async fn find_by_primary_id(&self, id: &PrimaryId) -> Result<Option<Record>, LookupError> {
        Ok(self.source.find_by_primary_id(id))
    }
}
