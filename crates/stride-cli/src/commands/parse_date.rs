use serde::Serialize;
use stride_engine::{Assistant, ParsedDate};

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ParseDateResponse<'a> {
    input: &'a str,
    parsed: Option<ParsedDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local: Option<String>,
}

/// Handle `stride parse-date`.
pub fn handle(text: &str, assistant: &Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    let parsed = assistant.parse_date(text);
    let local = parsed.map(|p| {
        p.instant
            .with_timezone(&chrono::Local)
            .format("%A %Y-%m-%d %H:%M")
            .to_string()
    });
    output(
        &ParseDateResponse {
            input: text,
            parsed,
            local,
        },
        flags.format,
    )
}
