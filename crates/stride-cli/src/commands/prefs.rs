use stride_core::entities::Preferences;
use stride_engine::Assistant;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{PrefsCommands, PrefsSetArgs};
use crate::commands::shared::parse::parse_enum;
use crate::output::output;

/// Handle `stride prefs`.
pub fn handle(
    action: &PrefsCommands,
    assistant: &mut Assistant,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        PrefsCommands::Show => output(&assistant.preferences(), flags.format),
        PrefsCommands::Set(args) => {
            let updated = apply(assistant.preferences(), args)?;
            output(&assistant.set_preferences(updated)?, flags.format)
        }
    }
}

fn apply(mut prefs: Preferences, args: &PrefsSetArgs) -> anyhow::Result<Preferences> {
    if let Some(depth) = args.depth {
        prefs.breakdown_depth = depth;
    }
    if let Some(step_size) = &args.step_size {
        prefs.step_size = parse_enum(step_size, "step size")?;
    }
    if let Some(style) = &args.style {
        prefs.style = parse_enum(style, "style")?;
    }
    if let Some(tone) = &args.tone {
        prefs.tone = parse_enum(tone, "tone")?;
    }
    if let Some(frequency) = &args.notifications {
        prefs.notification_frequency = parse_enum(frequency, "notification frequency")?;
    }
    Ok(prefs)
}
