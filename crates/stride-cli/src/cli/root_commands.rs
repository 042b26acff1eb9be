use clap::{Args, Subcommand};

use crate::cli::subcommands::PrefsCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Capture a task from free text.
    Add(AddArgs),
    /// List tasks.
    List(ListArgs),
    /// Get a task by ID, with its priority breakdown.
    Get { id: String },
    /// Edit a task. Requires --yes.
    Update(UpdateArgs),
    /// Mark a task completed.
    Complete { id: String },
    /// Push a task to a later date (tomorrow morning by default).
    Defer {
        id: String,
        /// When to pick it up again, e.g. "next monday" or "2026-04-01".
        #[arg(long)]
        until: Option<String>,
    },
    /// Delete a task. Children are left in place. Requires --yes.
    Delete {
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Override a task's priority (high, medium, low).
    Priority { id: String, level: String },
    /// The one task to work on now.
    Next,
    /// Break a task into micro-tasks.
    Atomize { id: String },
    /// Today's plan.
    Today {
        /// Show every open task for today instead of the focus list.
        #[arg(long)]
        all: bool,
    },
    /// Plans for the next seven days.
    Week,
    /// Current completion streak in days.
    Streak,
    /// Move stale scheduled tasks onto today.
    Sweep,
    /// Reminders derived from current tasks.
    Notifications,
    /// Show how a date phrase is understood.
    ParseDate {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Write the whole ledger to a JSON file.
    Export { file: String },
    /// Import tasks from a ledger export. Imported tasks get new IDs.
    Import { file: String },
    /// Preferences.
    Prefs {
        #[command(subcommand)]
        action: PrefsCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct AddArgs {
    /// What needs doing, e.g. "submit expenses by friday".
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Parent task ID.
    #[arg(long)]
    pub parent: Option<String>,
    /// Deadline phrase; otherwise one is looked for in the text.
    #[arg(long)]
    pub deadline: Option<String>,
    /// Day to work on it.
    #[arg(long)]
    pub scheduled: Option<String>,
    /// Estimated minutes.
    #[arg(long)]
    pub estimate: Option<u32>,
    /// high, medium, or low; otherwise classified.
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub note: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Filter by status (repeatable).
    #[arg(long)]
    pub status: Vec<String>,
    /// Filter by priority (repeatable).
    #[arg(long)]
    pub priority: Vec<String>,
    #[arg(long)]
    pub parent: Option<String>,
    /// Only tasks scheduled on this day.
    #[arg(long)]
    pub on: Option<String>,
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Args)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "clear_deadline")]
    pub deadline: Option<String>,
    #[arg(long)]
    pub clear_deadline: bool,
    #[arg(long, conflicts_with = "clear_scheduled")]
    pub scheduled: Option<String>,
    #[arg(long)]
    pub clear_scheduled: bool,
    #[arg(long)]
    pub estimate: Option<u32>,
    #[arg(long)]
    pub status: Option<String>,
    /// Replace the task's notes (repeatable).
    #[arg(long)]
    pub note: Vec<String>,
    /// Confirm the change.
    #[arg(long)]
    pub yes: bool,
}
