use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use stride_engine::Assistant;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse every value in `raw` as an enum.
pub fn parse_enums<T>(raw: &[String], field: &str) -> anyhow::Result<Vec<T>>
where
    T: DeserializeOwned,
{
    raw.iter().map(|value| parse_enum(value, field)).collect()
}

/// Resolve a date phrase ("tomorrow", "next friday", "2026-04-01") against now.
pub fn parse_when(assistant: &Assistant, raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    assistant
        .parse_date(raw)
        .map(|parsed| parsed.instant)
        .ok_or_else(|| anyhow::anyhow!("could not understand {field} '{raw}'"))
}
