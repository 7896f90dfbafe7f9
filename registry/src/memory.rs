//! Static in-memory registry.

use idcheck_types::{PrimaryId, Record};
use std::collections::HashMap;

use crate::{seed, RecordSource, RegistryError};

/// An immutable record set with keyed access by primary id.
#[derive(Clone, Debug)]
pub struct StaticRegistry {
    records: HashMap<PrimaryId, Record>,
}

impl StaticRegistry {
    /// Build a registry, rejecting duplicate primary ids.
    pub fn new(records: impl IntoIterator<Item = Record>) -> Result<Self, RegistryError> {
        let mut map = HashMap::new();
        for record in records {
            let key = record.primary_id.clone();
            if map.insert(key.clone(), record).is_some() {
                return Err(RegistryError::DuplicatePrimaryId(key.to_string()));
            }
        }
        tracing::debug!(count = map.len(), "record registry built");
        Ok(Self { records: map })
    }

    /// The built-in demo data set.
    pub fn demo() -> Self {
        let records = seed::demo_records();
        let records = records
            .into_iter()
            .map(|r| (r.primary_id.clone(), r))
            .collect();
        Self { records }
    }

    /// Iterate over all records in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

impl RecordSource for StaticRegistry {
    fn find_by_primary_id(&self, id: &PrimaryId) -> Option<Record> {
        self.records.get(id).cloned()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
