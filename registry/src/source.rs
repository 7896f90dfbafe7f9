//! The lookup seam.

use idcheck_types::{PrimaryId, Record};
use std::sync::Arc;

/// A read-only source of identity records keyed by primary id.
///
/// Implementations must be free of shared mutable state: the lookup service
/// calls them concurrently from independent sessions.
pub trait RecordSource: Send + Sync {
    /// Return the record whose primary id equals `id`, if any.
    fn find_by_primary_id(&self, id: &PrimaryId) -> Option<Record>;

    /// Number of records available.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Arc<S> {
    fn find_by_primary_id(&self, id: &PrimaryId) -> Option<Record> {
        (**self).find_by_primary_id(id)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
