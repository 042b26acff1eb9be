use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::HistoryEntry;
use crate::enums::{HistoryAction, Priority, TaskStatus};

/// Context carried from a parent task at creation time, plus free-form notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskContext {
    /// The parent's `raw_input`, copied when the child was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_goal: Option<String>,
    /// The parent's title, copied when the child was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_context: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub related_task_ids: Vec<String>,
}

/// A unit of work in the ledger.
///
/// `raw_input` is the verbatim text the task was captured from and never changes.
/// `history` only grows: every mutation appends at least one entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Task {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub raw_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub child_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    pub priority: Priority,
    pub priority_reason: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub context: TaskContext,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Task {
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.child_ids.is_empty()
    }

    #[must_use]
    pub const fn is_child(&self) -> bool {
        self.parent_id.is_some()
    }

    /// The instant that places this task on a calendar day: the scheduled
    /// date when set, otherwise the deadline.
    #[must_use]
    pub fn plan_instant(&self) -> Option<DateTime<Utc>> {
        self.scheduled_date.or(self.deadline)
    }

    /// Append a history entry and bump `updated_at` to its timestamp.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.updated_at = entry.timestamp;
        self.history.push(entry);
    }

    /// Timestamps of every completion recorded in history.
    pub fn completions(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.history
            .iter()
            .filter(|entry| entry.action == HistoryAction::Completed)
            .map(|entry| entry.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_task() -> Task {
        let created = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        Task {
            id: "tsk-0a1b2c3d".to_string(),
            created_at: created,
            updated_at: created,
            title: "Write quarterly report".to_string(),
            description: Some("Q1 numbers".to_string()),
            raw_input: "write quarterly report by friday".to_string(),
            parent_id: None,
            child_ids: vec!["tsk-11111111".to_string()],
            deadline: Some(Utc.with_ymd_and_hms(2026, 3, 6, 23, 59, 59).unwrap()),
            scheduled_date: None,
            estimated_minutes: Some(120),
            priority: Priority::High,
            priority_reason: "Due in 4 days".to_string(),
            status: TaskStatus::Pending,
            context: TaskContext {
                notes: vec!["ask finance for numbers".to_string()],
                ..TaskContext::default()
            },
            history: vec![HistoryEntry::new(created, HistoryAction::Created, "Task created")],
        }
    }

    #[test]
    fn task_json_roundtrip_is_lossless() {
        let task = sample_task();
        let json = serde_json::to_string(&task).unwrap();
        let recovered: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, task);
    }

    #[test]
    fn sub_second_timestamps_survive_roundtrip() {
        let mut task = sample_task();
        task.deadline = Some(
            Utc.with_ymd_and_hms(2026, 3, 6, 23, 59, 59).unwrap()
                + chrono::Duration::milliseconds(999),
        );
        let json = serde_json::to_value(&task).unwrap();
        let recovered: Task = serde_json::from_value(json).unwrap();
        assert_eq!(recovered.deadline, task.deadline);
    }

    #[test]
    fn absent_optionals_are_omitted_and_restored() {
        let mut task = sample_task();
        task.description = None;
        task.deadline = None;
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("description").is_none());
        assert!(json.get("deadline").is_none());
        let recovered: Task = serde_json::from_value(json).unwrap();
        assert_eq!(recovered, task);
    }

    #[test]
    fn history_change_with_null_roundtrips() {
        let entry = HistoryEntry::new(Utc::now(), HistoryAction::Updated, "deadline cleared")
            .with_change(serde_json::json!("2026-03-06T23:59:59Z"), serde_json::Value::Null);
        assert!(entry.new_value.is_none());
        let json = serde_json::to_string(&entry).unwrap();
        let recovered: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, entry);
    }

    #[test]
    fn plan_instant_prefers_scheduled_date() {
        let mut task = sample_task();
        assert_eq!(task.plan_instant(), task.deadline);
        let scheduled = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        task.scheduled_date = Some(scheduled);
        assert_eq!(task.plan_instant(), Some(scheduled));
    }

    #[test]
    fn record_appends_and_touches() {
        let mut task = sample_task();
        let later = task.created_at + chrono::Duration::hours(2);
        task.record(HistoryEntry::new(later, HistoryAction::Completed, "Task completed"));
        assert_eq!(task.history.len(), 2);
        assert_eq!(task.updated_at, later);
        assert_eq!(task.completions().collect::<Vec<_>>(), vec![later]);
    }
}
