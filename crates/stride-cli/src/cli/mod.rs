use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `stride` binary.
#[derive(Debug, Parser)]
#[command(name = "stride", version, about = "Stride - capture, plan, and break down your tasks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the task ledger and preferences
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            data_dir: self.data_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::PrefsCommands;
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_and_after_subcommand() {
        let cli = Cli::try_parse_from(["stride", "--format", "raw", "--verbose", "next"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Next));

        let cli = Cli::try_parse_from(["stride", "today", "--quiet", "--data-dir", "/tmp/s"])
            .expect("cli should parse");
        assert!(cli.quiet);
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.data_dir.as_deref(), Some("/tmp/s"));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["stride", "--format", "table", "next"]).is_err());
    }

    #[test]
    fn add_collects_words_into_raw_text() {
        let cli = Cli::try_parse_from([
            "stride", "add", "write", "quarterly", "report", "by", "friday", "--estimate", "90",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.text.join(" "), "write quarterly report by friday");
                assert_eq!(args.estimate, Some(90));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn update_and_delete_default_to_unconfirmed() {
        let cli = Cli::try_parse_from(["stride", "delete", "tsk-00000001"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Delete { yes: false, .. }));

        let cli = Cli::try_parse_from(["stride", "update", "tsk-00000001", "--title", "X", "--yes"])
            .expect("cli should parse");
        assert!(matches!(cli.command, Commands::Update(ref args) if args.yes));
    }

    #[test]
    fn prefs_set_parses_knobs() {
        let cli = Cli::try_parse_from(["stride", "prefs", "set", "--tone", "direct", "--depth", "3"])
            .expect("cli should parse");
        match cli.command {
            Commands::Prefs {
                action: PrefsCommands::Set(args),
            } => {
                assert_eq!(args.tone.as_deref(), Some("direct"));
                assert_eq!(args.depth, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
