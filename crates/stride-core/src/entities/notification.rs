use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{NotificationKind, NotificationStatus};
use crate::errors::CoreError;

/// An ephemeral reminder about a task.
///
/// Not part of the ledger: notifications can be rebuilt from task state at any time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub task_id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub scheduled_time: DateTime<Utc>,
    pub status: NotificationStatus,
    pub snooze_count: u32,
}

impl Notification {
    fn transition(&mut self, next: NotificationStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                kind: "notification",
                id: self.id.clone(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] unless the notification is pending.
    pub fn mark_sent(&mut self) -> Result<(), CoreError> {
        self.transition(NotificationStatus::Sent)
    }

    /// Push the notification back by `delay` and count the snooze.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] unless the notification is pending.
    pub fn snooze(&mut self, delay: Duration) -> Result<(), CoreError> {
        self.transition(NotificationStatus::Snoozed)?;
        self.scheduled_time += delay;
        self.snooze_count += 1;
        Ok(())
    }

    /// Return a snoozed notification to `pending` once its time has come.
    /// Returns whether the notification was released.
    pub fn release_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == NotificationStatus::Snoozed && self.scheduled_time <= now {
            self.status = NotificationStatus::Pending;
            return true;
        }
        false
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if already dismissed.
    pub fn dismiss(&mut self) -> Result<(), CoreError> {
        self.transition(NotificationStatus::Dismissed)
    }
}
