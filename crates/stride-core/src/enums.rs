//! Status enums, priority levels, history actions, and preference knobs.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` so the store
//! can refuse implicit transitions that would silently revert a task.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Three-level priority classification of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, most urgent first (`high` = 0).
    #[must_use]
    pub const fn urgency_rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Status of a task.
///
/// ```text
/// pending ⇄ in_progress → completed → archived
///    ↕          ↓
/// deferred ─────┘
/// ```
///
/// `completed` only moves forward to `archived`; anything else requires an
/// explicit update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Deferred,
    Archived,
}

impl TaskStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[
                Self::InProgress,
                Self::Completed,
                Self::Deferred,
                Self::Archived,
            ],
            Self::InProgress => &[
                Self::Pending,
                Self::Completed,
                Self::Deferred,
                Self::Archived,
            ],
            Self::Deferred => &[
                Self::Pending,
                Self::InProgress,
                Self::Completed,
                Self::Deferred,
                Self::Archived,
            ],
            Self::Completed => &[Self::Archived],
            Self::Archived => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// `completed` and `archived` never revert without an explicit update.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Archived)
    }

    /// Statuses eligible for the "what next" recommendation.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Deferred => "deferred",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HistoryAction
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in a task's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Updated,
    Completed,
    Deferred,
    Rescheduled,
}

impl HistoryAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Completed => "completed",
            Self::Deferred => "deferred",
            Self::Rescheduled => "rescheduled",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NotificationKind / NotificationStatus
// ---------------------------------------------------------------------------

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    DeadlineReminder,
    Overdue,
    DeferredCheckIn,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeadlineReminder => "deadline_reminder",
            Self::Overdue => "overdue",
            Self::DeferredCheckIn => "deferred_check_in",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery status of a notification.
///
/// ```text
/// pending → sent → dismissed
///         → snoozed → pending
///         → dismissed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Snoozed,
    Dismissed,
}

impl NotificationStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Sent, Self::Snoozed, Self::Dismissed],
            Self::Snoozed => &[Self::Pending, Self::Dismissed],
            Self::Sent => &[Self::Dismissed],
            Self::Dismissed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Snoozed => "snoozed",
            Self::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Preference knobs
// ---------------------------------------------------------------------------

/// Preferred size of a decomposed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepSize {
    Tiny,
    Small,
    Medium,
}

impl StepSize {
    /// Target duration in minutes handed to the decomposition prompt.
    #[must_use]
    pub const fn target_minutes(self) -> u32 {
        match self {
            Self::Tiny => 15,
            Self::Small => 30,
            Self::Medium => 45,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
        }
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much detail decompositions carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    Minimal,
    Balanced,
    Detailed,
}

impl StylePreset {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Balanced => "balanced",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voice used for generated steps and plan explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Encouraging,
    Neutral,
    Direct,
}

impl Tone {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encouraging => "encouraging",
            Self::Neutral => "neutral",
            Self::Direct => "direct",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How eagerly reminders are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationFrequency {
    Off,
    Minimal,
    Normal,
    Frequent,
}

impl NotificationFrequency {
    /// Multiplier applied to the configured reminder lead time. `None` = no reminders.
    #[must_use]
    pub const fn lead_factor(self) -> Option<f64> {
        match self {
            Self::Off => None,
            Self::Minimal => Some(0.25),
            Self::Normal => Some(1.0),
            Self::Frequent => Some(2.0),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Minimal => "minimal",
            Self::Normal => "normal",
            Self::Frequent => "frequent",
        }
    }
}

impl fmt::Display for NotificationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.urgency_rank() < Priority::Medium.urgency_rank());
        assert!(Priority::Medium.urgency_rank() < Priority::Low.urgency_rank());
    }

    #[test]
    fn priority_serializes_snake_case() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
        let parsed: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, Priority::Low);
    }

    #[rstest]
    #[case(TaskStatus::Pending, TaskStatus::Completed, true)]
    #[case(TaskStatus::Pending, TaskStatus::Deferred, true)]
    #[case(TaskStatus::Deferred, TaskStatus::Deferred, true)]
    #[case(TaskStatus::InProgress, TaskStatus::Pending, true)]
    #[case(TaskStatus::Completed, TaskStatus::Archived, true)]
    #[case(TaskStatus::Completed, TaskStatus::Pending, false)]
    #[case(TaskStatus::Completed, TaskStatus::Deferred, false)]
    #[case(TaskStatus::Archived, TaskStatus::Pending, false)]
    fn task_status_transitions(
        #[case] from: TaskStatus,
        #[case] to: TaskStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn task_status_in_progress_serializes_with_underscore() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn terminal_and_actionable_are_disjoint() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Deferred,
            TaskStatus::Archived,
        ] {
            assert!(!(status.is_terminal() && status.is_actionable()));
        }
    }

    #[test]
    fn notification_snooze_cycle_is_allowed() {
        assert!(NotificationStatus::Pending.can_transition_to(NotificationStatus::Snoozed));
        assert!(NotificationStatus::Snoozed.can_transition_to(NotificationStatus::Pending));
        assert!(!NotificationStatus::Dismissed.can_transition_to(NotificationStatus::Pending));
        assert!(!NotificationStatus::Sent.can_transition_to(NotificationStatus::Snoozed));
    }

    #[test]
    fn frequency_off_disables_reminders() {
        assert!(NotificationFrequency::Off.lead_factor().is_none());
        assert_eq!(NotificationFrequency::Normal.lead_factor(), Some(1.0));
    }

    #[test]
    fn step_size_targets_fit_micro_task_bounds() {
        for size in [StepSize::Tiny, StepSize::Small, StepSize::Medium] {
            assert!((15..=60).contains(&size.target_minutes()));
        }
    }
}
