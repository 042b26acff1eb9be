use stride_config::StrideConfig;
use stride_engine::Assistant;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    assistant: &mut Assistant,
    config: &StrideConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Add(args) => commands::task::add(&args, assistant, flags),
        Commands::List(args) => commands::task::list(&args, assistant, config, flags),
        Commands::Get { id } => commands::task::get(&id, assistant, flags),
        Commands::Update(args) => commands::task::update(&args, assistant, flags),
        Commands::Complete { id } => commands::task::complete(&id, assistant, flags),
        Commands::Defer { id, until } => {
            commands::task::defer(&id, until.as_deref(), assistant, flags)
        }
        Commands::Delete { id, yes } => commands::task::delete(&id, yes, assistant, flags),
        Commands::Priority { id, level } => {
            commands::task::set_priority(&id, &level, assistant, flags)
        }
        Commands::Atomize { id } => commands::atomize::handle(&id, assistant, flags).await,
        Commands::Next => commands::plan::next(assistant, flags),
        Commands::Today { all } => commands::plan::today(all, assistant, flags),
        Commands::Week => commands::plan::week(assistant, flags),
        Commands::Streak => commands::plan::streak(assistant, flags),
        Commands::Sweep => commands::plan::sweep(assistant, flags),
        Commands::Notifications => commands::plan::notifications(assistant, flags),
        Commands::ParseDate { text } => {
            commands::parse_date::handle(&text.join(" "), assistant, flags)
        }
        Commands::Export { file } => commands::transfer::export(&file, assistant, flags),
        Commands::Import { file } => commands::transfer::import(&file, assistant, flags),
        Commands::Prefs { action } => commands::prefs::handle(&action, assistant, flags),
    }
}
