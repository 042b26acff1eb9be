//! Task query filters.

use chrono::{DateTime, NaiveDate, Utc};
use stride_core::calendar::local_date;
use stride_core::entities::Task;
use stride_core::enums::{Priority, TaskStatus};

/// Criteria for [`crate::TaskStore::get_all`]. Every set criterion must
/// match; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Any of these statuses. Empty = any status.
    pub statuses: Vec<TaskStatus>,
    /// Any of these priorities. Empty = any priority.
    pub priorities: Vec<Priority>,
    /// Inclusive range over the scheduled date, or the deadline when unscheduled.
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub parent_id: Option<String>,
    /// Local calendar date the task is scheduled on.
    pub scheduled_on: Option<NaiveDate>,
}

impl TaskFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    #[must_use]
    pub fn priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.date_range = Some((start, end));
        self
    }

    #[must_use]
    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub const fn scheduled_on(mut self, date: NaiveDate) -> Self {
        self.scheduled_on = Some(date);
        self
    }

    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&task.status) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority) {
            return false;
        }
        if let Some((start, end)) = self.date_range {
            match task.plan_instant() {
                Some(instant) if instant >= start && instant <= end => {}
                _ => return false,
            }
        }
        if let Some(parent_id) = &self.parent_id {
            if task.parent_id.as_ref() != Some(parent_id) {
                return false;
            }
        }
        if let Some(date) = self.scheduled_on {
            if task.scheduled_date.map(local_date) != Some(date) {
                return false;
            }
        }
        true
    }
}
