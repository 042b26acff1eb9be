//! Durable record storage.
//!
//! The ledger treats storage as a flat list of task records: it loads them
//! once on open and saves the full collection after every mutation.

mod jsonl;
mod memory;

pub use jsonl::JsonlRecordStore;
pub use memory::MemoryRecordStore;

use stride_core::entities::Task;

use crate::error::StoreError;

/// A place task records live between runs.
pub trait RecordStore: Send + Sync {
    /// Read every stored task record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read at all.
    fn load(&self) -> Result<Vec<Task>, StoreError>;

    /// Replace the stored collection with `tasks`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails. The previous collection must
    /// remain readable in that case.
    fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}
