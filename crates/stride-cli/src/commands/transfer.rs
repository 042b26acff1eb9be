use std::fs;

use anyhow::Context;
use serde::Serialize;
use stride_engine::Assistant;
use stride_store::LedgerExport;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ExportResponse<'a> {
    file: &'a str,
    tasks: usize,
}

pub fn export(file: &str, assistant: &Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    let export = assistant.export();
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(file, json).with_context(|| format!("failed to write export to {file}"))?;
    output(
        &ExportResponse {
            file,
            tasks: export.tasks.len(),
        },
        flags.format,
    )
}

pub fn import(file: &str, assistant: &mut Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = fs::read_to_string(file).with_context(|| format!("failed to read {file}"))?;
    let export: LedgerExport =
        serde_json::from_str(&raw).with_context(|| format!("{file} is not a ledger export"))?;
    let imported = assistant.import(export)?;
    output(&imported, flags.format)
}
