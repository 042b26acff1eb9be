use clap::{Args, Subcommand};

/// Preference commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PrefsCommands {
    /// Show current preferences.
    Show,
    /// Change preferences. Unset flags keep their current value.
    Set(PrefsSetArgs),
}

#[derive(Clone, Debug, Args)]
pub struct PrefsSetArgs {
    /// Breakdown depth, 1-3.
    #[arg(long)]
    pub depth: Option<u8>,
    /// tiny, small, or medium.
    #[arg(long)]
    pub step_size: Option<String>,
    /// minimal, balanced, or detailed.
    #[arg(long)]
    pub style: Option<String>,
    /// encouraging, neutral, or direct.
    #[arg(long)]
    pub tone: Option<String>,
    /// off, minimal, normal, or frequent.
    #[arg(long)]
    pub notifications: Option<String>,
}
