//! # stride-config
//!
//! Layered configuration loading for Stride using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`STRIDE_*` prefix, `__` as separator)
//! 2. Project-level `.stride/config.toml`
//! 3. User-level `~/.config/stride/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `STRIDE_LLM__PROVIDER` -> `llm.provider`, `STRIDE_GENERAL__DATA_DIR` ->
//! `general.data_dir`, etc. The `__` (double underscore) separates nested sections.
//!
//! # Usage
//!
//! ```no_run
//! use stride_config::StrideConfig;
//!
//! let config = StrideConfig::load_with_dotenv().expect("config");
//! if config.llm.is_configured() {
//!     println!("Decomposing with {}", config.llm.effective_model());
//! }
//! ```

mod error;
mod general;
mod llm;
mod schedule;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use llm::{LlmConfig, LlmProvider};
pub use schedule::ScheduleConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StrideConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl StrideConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`StrideConfig::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source is malformed or a value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source is malformed or a value fails validation.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".stride/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("STRIDE_").split("__"))
    }

    /// Reject values that would break scheduling.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for out-of-range fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.defer_hour > 23 {
            return Err(ConfigError::InvalidValue {
                field: "schedule.defer_hour".to_string(),
                reason: format!("must be 0-23, got {}", self.schedule.defer_hour),
            });
        }
        if self.general.today_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.today_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stride").join("config.toml"))
    }
}
