//! In-memory backend for tests and dry runs.

use std::sync::{Arc, Mutex, PoisonError};

use stride_core::entities::Task;

use super::RecordStore;
use crate::error::StoreError;

/// Keeps serialized records in memory.
///
/// Records are held as JSON values, the same flat shape the file backend
/// writes, so a save/load cycle exercises serialization. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The records as last saved.
    #[must_use]
    pub fn snapshot(&self) -> Vec<serde_json::Value> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        self.snapshot()
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(StoreError::from))
            .collect()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let records = tasks
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = records;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
