//! Nullable lookup: scripted record answers without a server.

use async_trait::async_trait;
use idcheck_flow::{LookupError, RecordLookup};
use idcheck_types::{PrimaryId, Record};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A lookup backend that answers from an in-memory map and records every call.
pub struct NullLookup {
    records: HashMap<PrimaryId, Record>,
    /// When set, every call fails with this error instead.
    failure: Mutex<Option<LookupError>>,
    /// Pause before answering (useful with paused tokio time).
    delay: Duration,
    calls: Mutex<Vec<PrimaryId>>,
}

impl NullLookup {
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.primary_id.clone(), r))
                .collect(),
            failure: Mutex::new(None),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend that knows no records at all.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every following call fail with `error`.
    pub fn fail_with(&self, error: LookupError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Answer normally again.
    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Every id looked up so far, in order.
    pub fn calls(&self) -> Vec<PrimaryId> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordLookup for NullLookup {
    async fn find_by_primary_id(&self, id: &PrimaryId) -> Result<Option<Record>, LookupError> {
        self.calls.lock().unwrap().push(id.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let failure = self.failure.lock().unwrap().clone();
        if let Some(error) = failure {
            return Err(error);
        }
        Ok(self.records.get(id).cloned())
    }
}
