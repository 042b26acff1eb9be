//! The task ledger.
//!
//! `TaskStore` is an arena of task records keyed by id. Children point at their
//! parent by id and parents list their children by id; neither owns the other.
//! Every mutation is staged on copies, saved through the [`RecordStore`], and
//! only then swapped into memory, so a failed save leaves the ledger unchanged.

mod create;
mod lifecycle;
mod transfer;
mod update;

pub use transfer::{LEDGER_EXPORT_VERSION, LedgerExport};

use std::collections::HashMap;
use std::sync::Arc;

use stride_core::clock::Clock;
use stride_core::entities::Task;
use stride_core::ids::{PREFIX_TASK, generate_id};
use tracing::debug;

use crate::backend::RecordStore;
use crate::error::StoreError;
use crate::filter::TaskFilter;

/// Default local hour a deferred task is rescheduled to.
pub const DEFAULT_DEFER_HOUR: u32 = 9;

pub struct TaskStore {
    backend: Box<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    tasks: HashMap<String, Task>,
    defer_hour: u32,
}

impl TaskStore {
    /// Load the ledger from `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    pub fn open(backend: Box<dyn RecordStore>, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let loaded = backend.load()?;
        debug!(backend = %backend.describe(), count = loaded.len(), "opened task ledger");
        let tasks = loaded
            .into_iter()
            .map(|task| (task.id.clone(), task))
            .collect();
        Ok(Self {
            backend,
            clock,
            tasks,
            defer_hour: DEFAULT_DEFER_HOUR,
        })
    }

    /// Override the local hour deferrals land on.
    #[must_use]
    pub fn with_defer_hour(mut self, hour: u32) -> Self {
        self.defer_hour = hour.min(23);
        self
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Like [`TaskStore::get`], but a missing id is an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has this id.
    pub fn require(&self, id: &str) -> Result<&Task, StoreError> {
        self.tasks.get(id).ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    /// Tasks matching `filter`, oldest first.
    #[must_use]
    pub fn get_all(&self, filter: &TaskFilter) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        sort_by_creation(&mut tasks);
        tasks
    }

    /// Tasks whose `parent_id` names a task that no longer exists.
    ///
    /// Deletion never cascades, so children of a deleted task end up here
    /// until they are re-homed or deleted.
    #[must_use]
    pub fn orphans(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| {
                task.parent_id
                    .as_deref()
                    .is_some_and(|parent| !self.tasks.contains_key(parent))
            })
            .cloned()
            .collect();
        sort_by_creation(&mut tasks);
        tasks
    }

    fn fresh_id(&self, taken: &HashMap<String, String>) -> Result<String, StoreError> {
        loop {
            let id = generate_id(PREFIX_TASK)?;
            if !self.tasks.contains_key(&id) && !taken.values().any(|v| *v == id) {
                return Ok(id);
            }
        }
    }

    /// Save the ledger with `upserts` applied and `removal` dropped, then
    /// adopt that state in memory.
    fn commit(&mut self, upserts: Vec<Task>, removal: Option<&str>) -> Result<(), StoreError> {
        let mut next = self.tasks.clone();
        if let Some(id) = removal {
            next.remove(id);
        }
        for task in upserts {
            next.insert(task.id.clone(), task);
        }

        let mut ordered: Vec<Task> = next.values().cloned().collect();
        sort_by_creation(&mut ordered);
        self.backend.save(&ordered)?;

        self.tasks = next;
        Ok(())
    }
}

fn sort_by_creation(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}
