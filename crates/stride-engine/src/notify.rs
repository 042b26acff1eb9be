//! Reminder planning.
//!
//! Notifications are derived from task state on demand and never stored in
//! the ledger. Delivery timers are the caller's business; this module only
//! decides what should be said and when.

use chrono::{DateTime, Duration, Local, Utc};
use stride_core::entities::{Notification, Task};
use stride_core::enums::{NotificationFrequency, NotificationKind, NotificationStatus, TaskStatus};
use stride_core::errors::CoreError;
use stride_core::ids::{PREFIX_NOTIFICATION, derived_id};
use tracing::debug;

/// Default reminder lead before a deadline at normal frequency.
pub const DEFAULT_REMINDER_LEAD_HOURS: u32 = 24;

#[derive(Debug, Clone, Copy)]
pub struct NotificationPlanner {
    lead_hours: u32,
    frequency: NotificationFrequency,
}

impl Default for NotificationPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_REMINDER_LEAD_HOURS, NotificationFrequency::Normal)
    }
}

impl NotificationPlanner {
    #[must_use]
    pub const fn new(lead_hours: u32, frequency: NotificationFrequency) -> Self {
        Self {
            lead_hours,
            frequency,
        }
    }

    /// Lead time before a deadline, scaled by frequency. `None` when
    /// notifications are off.
    #[must_use]
    pub fn lead(&self) -> Option<Duration> {
        let factor = self.frequency.lead_factor()?;
        #[allow(clippy::cast_possible_truncation)]
        let minutes = (f64::from(self.lead_hours) * 60.0 * factor).round() as i64;
        Some(Duration::minutes(minutes))
    }

    /// Pending notifications for every open task, ordered by time.
    ///
    /// Ids come from the task id and the notification kind, so planning the
    /// same ledger twice yields the same ids.
    #[must_use]
    pub fn plan(&self, tasks: &[Task], now: DateTime<Utc>) -> Vec<Notification> {
        let Some(lead) = self.lead() else {
            return Vec::new();
        };

        let mut planned = Vec::new();
        for task in tasks.iter().filter(|task| !task.status.is_terminal()) {
            if let Some(deadline) = task.deadline {
                if deadline < now {
                    planned.push(notification(
                        task,
                        NotificationKind::Overdue,
                        format!("\"{}\" is overdue. Want to reschedule it?", task.title),
                        now,
                    ));
                } else {
                    planned.push(notification(
                        task,
                        NotificationKind::DeadlineReminder,
                        format!("\"{}\" is due {}", task.title, describe(deadline)),
                        (deadline - lead).max(now),
                    ));
                }
            }
            if task.status == TaskStatus::Deferred {
                if let Some(scheduled) = task.scheduled_date {
                    planned.push(notification(
                        task,
                        NotificationKind::DeferredCheckIn,
                        format!("Ready to pick up \"{}\" again?", task.title),
                        scheduled.max(now),
                    ));
                }
            }
        }
        planned.sort_by_key(|n| n.scheduled_time);
        debug!(count = planned.len(), frequency = %self.frequency, "planned notifications");
        planned
    }
}

fn notification(
    task: &Task,
    kind: NotificationKind,
    message: String,
    scheduled_time: DateTime<Utc>,
) -> Notification {
    Notification {
        id: derived_id(PREFIX_NOTIFICATION, &task.id, kind.as_str()),
        task_id: task.id.clone(),
        kind,
        message,
        scheduled_time,
        status: NotificationStatus::Pending,
        snooze_count: 0,
    }
}

fn describe(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%A %-d %B at %H:%M")
        .to_string()
}

/// Pending notifications whose time has come.
#[must_use]
pub fn due(notifications: &[Notification], now: DateTime<Utc>) -> Vec<&Notification> {
    notifications
        .iter()
        .filter(|n| n.status == NotificationStatus::Pending && n.scheduled_time <= now)
        .collect()
}

/// Snooze a pending notification by whole minutes.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTransition`] unless the notification is pending.
pub fn snooze_minutes(notification: &mut Notification, minutes: u32) -> Result<(), CoreError> {
    notification.snooze(Duration::minutes(i64::from(minutes)))
}

/// Return every snoozed notification that is due to pending. Returns how many
/// were released.
pub fn release_due(notifications: &mut [Notification], now: DateTime<Utc>) -> usize {
    notifications
        .iter_mut()
        .map(|n| n.release_if_due(now))
        .filter(|released| *released)
        .count()
}
