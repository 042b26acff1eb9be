//! Scheduling knobs used by deferral and reminders.

use serde::{Deserialize, Serialize};

const fn default_defer_hour() -> u32 {
    9
}

const fn default_reminder_lead_hours() -> u32 {
    24
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Local hour a deferred task lands on when no date is given.
    #[serde(default = "default_defer_hour")]
    pub defer_hour: u32,

    /// Hours before a deadline that a reminder fires at normal frequency.
    #[serde(default = "default_reminder_lead_hours")]
    pub reminder_lead_hours: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            defer_hour: default_defer_hour(),
            reminder_lead_hours: default_reminder_lead_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ScheduleConfig::default();
        assert_eq!(config.defer_hour, 9);
        assert_eq!(config.reminder_lead_hours, 24);
    }
}
