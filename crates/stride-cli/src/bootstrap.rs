use anyhow::Context;
use stride_config::StrideConfig;
use stride_engine::Assistant;

use crate::cli::GlobalFlags;

/// Load layered config (with `.env`), then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<StrideConfig> {
    let mut config = StrideConfig::load_with_dotenv().context("failed to load stride config")?;
    if let Some(data_dir) = &flags.data_dir {
        config.general.data_dir.clone_from(data_dir);
    }
    Ok(config)
}

pub fn open_assistant(config: &StrideConfig) -> anyhow::Result<Assistant> {
    if !config.llm.is_configured() {
        tracing::debug!("no text generator configured; decomposition uses single-step fallbacks");
    }
    Assistant::open(config).with_context(|| {
        format!(
            "failed to open task ledger in {}",
            config.general.resolved_data_dir().display()
        )
    })
}
