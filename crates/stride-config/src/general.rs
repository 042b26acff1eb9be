//! General application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

/// Default number of tasks surfaced in today's focus list.
const fn default_today_limit() -> usize {
    7
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Where the task ledger and preferences live. Empty = platform data dir.
    #[serde(default)]
    pub data_dir: String,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Maximum tasks shown by `today`.
    #[serde(default = "default_today_limit")]
    pub today_limit: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            default_limit: default_limit(),
            today_limit: default_today_limit(),
        }
    }
}

impl GeneralConfig {
    /// Resolve the data directory, falling back to `{data_dir}/stride`.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        if !self.data_dir.is_empty() {
            return PathBuf::from(&self.data_dir);
        }
        dirs::data_dir().map_or_else(|| PathBuf::from(".stride"), |p| p.join("stride"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert!(config.data_dir.is_empty());
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.today_limit, 7);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = GeneralConfig {
            data_dir: "/tmp/stride-data".to_string(),
            ..GeneralConfig::default()
        };
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/tmp/stride-data"));
    }
}
