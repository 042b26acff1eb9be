//! Whole-ledger export and import.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stride_core::entities::{HistoryEntry, Task};
use stride_core::enums::HistoryAction;
use stride_core::errors::CoreError;
use tracing::info;

use super::{TaskStore, sort_by_creation};
use crate::error::StoreError;

pub const LEDGER_EXPORT_VERSION: u32 = 1;

/// A self-contained copy of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerExport {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub tasks: Vec<Task>,
}

impl TaskStore {
    /// Snapshot every task, oldest first.
    #[must_use]
    pub fn export(&self) -> LedgerExport {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        sort_by_creation(&mut tasks);
        LedgerExport {
            version: LEDGER_EXPORT_VERSION,
            exported_at: self.clock.now(),
            tasks,
        }
    }

    /// Add every task in `export` under a fresh id.
    ///
    /// Parent, child, and related references are rewritten to the new ids.
    /// References to tasks outside the export are dropped. Each imported task
    /// keeps its history and gains an `Imported from <old id>` entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an unsupported export version, or
    /// a persistence error.
    pub fn import(&mut self, export: LedgerExport) -> Result<Vec<Task>, StoreError> {
        if export.version != LEDGER_EXPORT_VERSION {
            return Err(CoreError::Validation(format!(
                "unsupported ledger export version {} (expected {LEDGER_EXPORT_VERSION})",
                export.version
            ))
            .into());
        }

        let mut remap: HashMap<String, String> = HashMap::with_capacity(export.tasks.len());
        for task in &export.tasks {
            let fresh = self.fresh_id(&remap)?;
            remap.insert(task.id.clone(), fresh);
        }

        let now = self.clock.now();
        let imported: Vec<Task> = export
            .tasks
            .into_iter()
            .filter_map(|mut task| {
                let old_id = std::mem::take(&mut task.id);
                task.id = remap.get(&old_id)?.clone();
                task.parent_id = task.parent_id.and_then(|p| remap.get(&p).cloned());
                task.child_ids = remap_all(&task.child_ids, &remap);
                task.context.related_task_ids = remap_all(&task.context.related_task_ids, &remap);
                task.record(HistoryEntry::new(
                    now,
                    HistoryAction::Updated,
                    format!("Imported from {old_id}"),
                ));
                Some(task)
            })
            .collect();

        self.commit(imported.clone(), None)?;
        info!(count = imported.len(), "imported tasks");
        Ok(imported)
    }
}

fn remap_all(ids: &[String], remap: &HashMap<String, String>) -> Vec<String> {
    ids.iter().filter_map(|id| remap.get(id).cloned()).collect()
}
