//! Preferences persistence.
//!
//! Preferences are a single record, replaced wholesale and never versioned.

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use stride_core::entities::Preferences;
use tracing::{debug, info};

use crate::error::StoreError;

enum Backend {
    File(PathBuf),
    Memory(Mutex<Preferences>),
}

pub struct PreferencesStore {
    backend: Backend,
}

impl PreferencesStore {
    /// Preferences stored as pretty JSON at `path`.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(path.into()),
        }
    }

    #[must_use]
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(Preferences::default())),
        }
    }

    /// Current preferences; defaults when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Preferences, StoreError> {
        match &self.backend {
            Backend::Memory(prefs) => Ok(*prefs.lock().unwrap_or_else(PoisonError::into_inner)),
            Backend::File(path) => {
                if !path.exists() {
                    debug!(path = %path.display(), "no preferences file, using defaults");
                    return Ok(Preferences::default());
                }
                let raw = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&raw)?)
            }
        }
    }

    /// Validate and store `prefs` in place of the current record.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range values, or an I/O error.
    pub fn replace(&self, prefs: Preferences) -> Result<Preferences, StoreError> {
        prefs.validate()?;
        match &self.backend {
            Backend::Memory(current) => {
                *current.lock().unwrap_or_else(PoisonError::into_inner) = prefs;
            }
            Backend::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                let temp = path.with_extension("json.tmp");
                fs::write(&temp, serde_json::to_string_pretty(&prefs)?)?;
                fs::rename(&temp, path)?;
            }
        }
        info!(?prefs, "replaced preferences");
        Ok(prefs)
    }
}
