use serde::Serialize;
use stride_engine::Assistant;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StreakResponse {
    streak_days: u32,
}

pub fn next(assistant: &Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&assistant.next_task(), flags.format)
}

pub fn today(all: bool, assistant: &Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    if all {
        output(&assistant.today_plan(), flags.format)
    } else {
        output(&assistant.today_tasks(), flags.format)
    }
}

pub fn week(assistant: &Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&assistant.week_plan(), flags.format)
}

pub fn streak(assistant: &Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(
        &StreakResponse {
            streak_days: assistant.streak(),
        },
        flags.format,
    )
}

pub fn sweep(assistant: &mut Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&assistant.sweep()?, flags.format)
}

pub fn notifications(assistant: &Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&assistant.notifications(), flags.format)
}
