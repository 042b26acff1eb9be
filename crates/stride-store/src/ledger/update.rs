use chrono::{DateTime, Utc};
use serde::Serialize;
use stride_core::entities::{HistoryEntry, Task};
use stride_core::enums::{HistoryAction, Priority, TaskStatus};
use tracing::info;

use super::TaskStore;
use crate::error::StoreError;
use crate::updates::{MutationIntent, TaskPatch, TaskPatchBuilder};

impl TaskStore {
    /// Apply `patch` to a task, appending one history entry per changed field.
    ///
    /// A patch that changes nothing appends nothing and returns the task as is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ExplicitRequired`] for an implicit request (the
    /// task is left untouched), [`StoreError::NotFound`] for an unknown id, or a
    /// persistence error.
    pub fn update(
        &mut self,
        id: &str,
        patch: TaskPatch,
        intent: MutationIntent,
    ) -> Result<Task, StoreError> {
        if !intent.is_explicit() {
            return Err(StoreError::ExplicitRequired {
                operation: "update",
                id: id.to_string(),
            });
        }

        let mut task = self.require(id)?.clone();
        let entries = apply_patch(&mut task, patch, self.clock.now());
        if entries.is_empty() {
            return Ok(task);
        }

        let changed: Vec<&str> = entries.iter().map(|e| e.details.as_str()).collect();
        info!(id, changes = ?changed, "updated task");
        for entry in entries {
            task.record(entry);
        }
        self.commit(vec![task.clone()], None)?;
        Ok(task)
    }

    /// Set a priority by hand. Recorded with the reason `User override: <level>`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id, or a persistence error.
    pub fn override_priority(&mut self, id: &str, priority: Priority) -> Result<Task, StoreError> {
        let patch = TaskPatchBuilder::new()
            .priority(priority, override_reason(priority))
            .build();
        self.update(id, patch, MutationIntent::Explicit)
    }
}

/// Reason recorded for a manual priority change.
#[must_use]
pub fn override_reason(priority: Priority) -> String {
    format!("User override: {priority}")
}

fn apply_patch(task: &mut Task, patch: TaskPatch, now: DateTime<Utc>) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();
    let mut push = |entry: Option<HistoryEntry>| entries.extend(entry);

    if let Some(title) = patch.title {
        push(change(now, "title", &mut task.title, title));
    }
    if let Some(description) = patch.description {
        push(change(now, "description", &mut task.description, description));
    }
    if let Some(deadline) = patch.deadline {
        push(change(now, "deadline", &mut task.deadline, deadline));
    }
    if let Some(scheduled) = patch.scheduled_date {
        push(change(now, "scheduled_date", &mut task.scheduled_date, scheduled));
    }
    if let Some(minutes) = patch.estimated_minutes {
        let minutes = minutes.filter(|m| *m > 0);
        push(change(now, "estimated_minutes", &mut task.estimated_minutes, minutes));
    }
    if let Some(priority) = patch.priority {
        push(change(now, "priority", &mut task.priority, priority));
    }
    if let Some(reason) = patch.priority_reason.filter(|r| !r.trim().is_empty()) {
        push(change(now, "priority_reason", &mut task.priority_reason, reason));
    }
    if let Some(status) = patch.status {
        push(change(now, "status", &mut task.status, status));
    }
    if let Some(notes) = patch.notes {
        push(change(now, "notes", &mut task.context.notes, notes));
    }
    if let Some(related) = patch.related_task_ids {
        push(change(now, "related_task_ids", &mut task.context.related_task_ids, related));
    }
    entries
}

/// Replace `slot` with `next` if they differ and describe the change.
fn change<T>(now: DateTime<Utc>, field: &str, slot: &mut T, next: T) -> Option<HistoryEntry>
where
    T: PartialEq + Serialize,
{
    if *slot == next {
        return None;
    }
    let previous = serde_json::to_value(&*slot).unwrap_or_default();
    let new = serde_json::to_value(&next).unwrap_or_default();
    let action = action_for(field, &new);
    *slot = next;
    Some(HistoryEntry::new(now, action, format!("Changed {field}")).with_change(previous, new))
}

/// Status changes to `completed`/`deferred` keep their lifecycle action so
/// streaks and reports see them; date moves read as reschedules.
fn action_for(field: &str, new: &serde_json::Value) -> HistoryAction {
    match field {
        "scheduled_date" => HistoryAction::Rescheduled,
        "status" if *new == TaskStatus::Completed.as_str() => HistoryAction::Completed,
        "status" if *new == TaskStatus::Deferred.as_str() => HistoryAction::Deferred,
        _ => HistoryAction::Updated,
    }
}
