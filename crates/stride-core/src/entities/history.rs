use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::HistoryAction;

/// One entry in a task's append-only history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<serde_json::Value>,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        action: HistoryAction,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            action,
            details: details.into(),
            previous_value: None,
            new_value: None,
        }
    }

    /// Attach the before/after values of the changed field.
    ///
    /// JSON `null` is stored as `None` so an absent value survives a round trip.
    #[must_use]
    pub fn with_change(
        mut self,
        previous_value: serde_json::Value,
        new_value: serde_json::Value,
    ) -> Self {
        self.previous_value = (!previous_value.is_null()).then_some(previous_value);
        self.new_value = (!new_value.is_null()).then_some(new_value);
        self
    }
}
