//! Task creation input.

use chrono::{DateTime, Utc};
use stride_core::enums::Priority;

/// Everything needed to create a task.
///
/// Only `raw_input` is required. A missing or blank title falls back to the
/// whitespace-normalized raw input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskInput {
    pub raw_input: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub estimated_minutes: Option<u32>,
    pub priority: Option<Priority>,
    pub priority_reason: Option<String>,
    pub notes: Vec<String>,
    pub related_task_ids: Vec<String>,
}

impl CreateTaskInput {
    #[must_use]
    pub fn new(raw_input: impl Into<String>) -> Self {
        Self {
            raw_input: raw_input.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub const fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub const fn scheduled(mut self, scheduled_date: DateTime<Utc>) -> Self {
        self.scheduled_date = Some(scheduled_date);
        self
    }

    #[must_use]
    pub const fn estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority, reason: impl Into<String>) -> Self {
        self.priority = Some(priority);
        self.priority_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[must_use]
    pub fn related(mut self, task_id: impl Into<String>) -> Self {
        self.related_task_ids.push(task_id.into());
        self
    }

    /// The title the task will be stored with.
    #[must_use]
    pub fn resolved_title(&self) -> String {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(
                || self.raw_input.split_whitespace().collect::<Vec<_>>().join(" "),
                ToString::to_string,
            )
    }

    /// Zero is not a meaningful estimate and is stored as absent.
    #[must_use]
    pub fn resolved_estimate(&self) -> Option<u32> {
        self.estimated_minutes.filter(|m| *m > 0)
    }
}
