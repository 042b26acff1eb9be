use stride_engine::Assistant;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `stride atomize`.
pub async fn handle(
    id: &str,
    assistant: &mut Assistant,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let atomized = assistant.atomize_task(id).await?;
    if atomized.children.is_empty() {
        tracing::info!(id, source = ?atomized.result.source, "task kept as a single step");
    }
    output(&atomized, flags.format)
}
