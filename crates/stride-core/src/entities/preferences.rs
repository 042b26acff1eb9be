use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{NotificationFrequency, StepSize, StylePreset, Tone};
use crate::errors::CoreError;

const fn default_breakdown_depth() -> u8 {
    2
}

/// User-tunable knobs. Replaced wholesale; no history is kept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Preferences {
    /// How many levels of decomposition to allow (1-3).
    #[serde(default = "default_breakdown_depth")]
    pub breakdown_depth: u8,
    pub step_size: StepSize,
    pub style: StylePreset,
    pub tone: Tone,
    pub notification_frequency: NotificationFrequency,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            breakdown_depth: default_breakdown_depth(),
            step_size: StepSize::Small,
            style: StylePreset::Balanced,
            tone: Tone::Encouraging,
            notification_frequency: NotificationFrequency::Normal,
        }
    }
}

impl Preferences {
    /// Maximum number of micro-tasks a decomposition should propose.
    #[must_use]
    pub const fn max_steps(&self) -> usize {
        match self.breakdown_depth {
            0 | 1 => 4,
            2 => 7,
            _ => 10,
        }
    }

    /// Reject out-of-range values before they are persisted.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when `breakdown_depth` is outside 1-3.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(1..=3).contains(&self.breakdown_depth) {
            return Err(CoreError::Validation(format!(
                "breakdown_depth must be between 1 and 3, got {}",
                self.breakdown_depth
            )));
        }
        Ok(())
    }
}
