use std::collections::HashMap;

use serde_json::json;
use stride_core::entities::{HistoryEntry, Task, TaskContext};
use stride_core::enums::{HistoryAction, Priority, TaskStatus};
use tracing::info;

use super::TaskStore;
use crate::error::StoreError;
use crate::input::CreateTaskInput;

impl TaskStore {
    /// Create a task with exactly one `created` history entry.
    ///
    /// With a parent, the parent gains the child id (recorded in its history)
    /// and the child copies the parent's title and raw input into its context.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ParentNotFound`] if `parent_id` names no task, or a
    /// persistence error if the save fails.
    pub fn create(&mut self, input: CreateTaskInput) -> Result<Task, StoreError> {
        let now = self.clock.now();
        let id = self.fresh_id(&HashMap::new())?;
        let title = input.resolved_title();
        let estimated_minutes = input.resolved_estimate();

        let mut context = TaskContext {
            notes: input.notes,
            related_task_ids: input.related_task_ids,
            ..TaskContext::default()
        };

        let mut upserts = Vec::with_capacity(2);
        if let Some(parent_id) = input.parent_id.as_deref() {
            let mut parent = self
                .get(parent_id)
                .cloned()
                .ok_or_else(|| StoreError::ParentNotFound {
                    id: parent_id.to_string(),
                })?;
            context.original_goal = Some(parent.raw_input.clone());
            context.parent_context = Some(parent.title.clone());

            let previous = json!(parent.child_ids);
            parent.child_ids.push(id.clone());
            let entry = HistoryEntry::new(now, HistoryAction::Updated, format!("Added child task {id}"))
                .with_change(previous, json!(parent.child_ids));
            parent.record(entry);
            upserts.push(parent);
        }

        let priority = input.priority.unwrap_or(Priority::Medium);
        let priority_reason = input
            .priority_reason
            .filter(|reason| !reason.trim().is_empty())
            .unwrap_or_else(|| format!("Default {priority} priority"));

        let task = Task {
            id: id.clone(),
            created_at: now,
            updated_at: now,
            title,
            description: input.description,
            raw_input: input.raw_input,
            parent_id: input.parent_id,
            child_ids: Vec::new(),
            deadline: input.deadline,
            scheduled_date: input.scheduled_date,
            estimated_minutes,
            priority,
            priority_reason,
            status: TaskStatus::Pending,
            context,
            history: vec![HistoryEntry::new(now, HistoryAction::Created, "Task created")],
        };
        upserts.push(task.clone());

        self.commit(upserts, None)?;
        info!(id = %task.id, title = %task.title, parent = ?task.parent_id, "created task");
        Ok(task)
    }
}
