//! Task patch builder and the explicit-mutation flag.

use chrono::{DateTime, Utc};
use serde::Serialize;
use stride_core::enums::{Priority, TaskStatus};

/// Whether a mutation was deliberately requested by the user.
///
/// `update` and `delete` refuse [`MutationIntent::Implicit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationIntent {
    Explicit,
    Implicit,
}

impl MutationIntent {
    #[must_use]
    pub const fn from_flag(explicit: bool) -> Self {
        if explicit { Self::Explicit } else { Self::Implicit }
    }

    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, Self::Explicit)
    }
}

/// A partial update. `None` leaves a field alone; `Some(None)` clears a
/// clearable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_task_ids: Option<Vec<String>>,
}

impl TaskPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub struct TaskPatchBuilder(TaskPatch);

impl Default for TaskPatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TaskPatch::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub const fn deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.0.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub const fn scheduled_date(mut self, scheduled_date: Option<DateTime<Utc>>) -> Self {
        self.0.scheduled_date = Some(scheduled_date);
        self
    }

    #[must_use]
    pub const fn estimated_minutes(mut self, minutes: Option<u32>) -> Self {
        self.0.estimated_minutes = Some(minutes);
        self
    }

    /// Set the priority level together with its justification.
    #[must_use]
    pub fn priority(mut self, priority: Priority, reason: impl Into<String>) -> Self {
        self.0.priority = Some(priority);
        self.0.priority_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Vec<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn related_task_ids(mut self, ids: Vec<String>) -> Self {
        self.0.related_task_ids = Some(ids);
        self
    }

    #[must_use]
    pub fn build(self) -> TaskPatch {
        self.0
    }
}
