//! JSONL file backend: one task record per line.

use std::fs;
use std::path::{Path, PathBuf};

use stride_core::entities::Task;
use tracing::{debug, warn};

use super::RecordStore;
use crate::error::StoreError;

/// Stores tasks in a `.jsonl` file.
///
/// Saves write a sibling temp file and rename it over the original, so a
/// crash mid-write leaves the previous collection intact.
#[derive(Debug, Clone)]
pub struct JsonlRecordStore {
    path: PathBuf,
}

impl JsonlRecordStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("jsonl.tmp")
    }
}

impl RecordStore for JsonlRecordStore {
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no task file yet");
            return Ok(Vec::new());
        }

        let mut tasks = Vec::new();
        for (index, record) in serde_jsonlines::json_lines::<Task, _>(&self.path)?.enumerate() {
            match record {
                Ok(task) => tasks.push(task),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "skipping unreadable task record"
                ),
            }
        }
        debug!(path = %self.path.display(), count = tasks.len(), "loaded task records");
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        serde_jsonlines::write_json_lines(&temp, tasks)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
