//! ID prefixes and generation.
//!
//! IDs have the form `{prefix}-{8 lowercase hex}`, e.g. `tsk-3fa9c01e`.

use crate::errors::CoreError;

pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_NOTIFICATION: &str = "ntf";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_TASK, PREFIX_NOTIFICATION];

/// Generate a fresh random ID with the given prefix.
///
/// # Errors
///
/// Returns [`CoreError::Other`] if the OS random source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("failed to generate {prefix} id: {e}")))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}

/// A stable id for a record derived from another one, e.g.
/// `ntf-3fa9c01e-overdue` for the overdue notice of `tsk-3fa9c01e`.
#[must_use]
pub fn derived_id(prefix: &str, source_id: &str, tag: &str) -> String {
    let source = source_id.split_once('-').map_or(source_id, |(_, rest)| rest);
    format!("{prefix}-{source}-{tag}")
}

/// Whether `id` carries `prefix` followed by eight hex characters.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
