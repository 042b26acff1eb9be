//! Recover a JSON payload from model text output.
//!
//! Models asked for JSON still wrap it in Markdown fences or prose now and then.

use crate::error::GenerationError;

/// Parse the JSON object contained in `text`.
///
/// Tries, in order: the whole trimmed text, the body of a fenced code block,
/// and the outermost `{ ... }` span.
///
/// # Errors
///
/// Returns [`GenerationError::MalformedResponse`] when no candidate parses.
pub fn extract_json_payload(text: &str) -> Result<serde_json::Value, GenerationError> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(body) = fenced_body(trimmed) {
        if let Ok(value) = serde_json::from_str(body) {
            return Ok(value);
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    let preview: String = trimmed.chars().take(120).collect();
    Err(GenerationError::MalformedResponse(format!(
        "no JSON object in model output: {preview}"
    )))
}

fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}
