use anyhow::Context;
use serde::Serialize;
use stride_config::StrideConfig;
use stride_core::entities::Task;
use stride_core::enums::{Priority, TaskStatus};
use stride_engine::{Assistant, Classification};
use stride_store::{CreateTaskInput, MutationIntent, TaskFilter, TaskPatchBuilder};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{AddArgs, ListArgs, UpdateArgs};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_enums, parse_when};
use crate::output::output;

#[derive(Debug, Serialize)]
struct TaskDetail<'a> {
    task: &'a Task,
    classification: Classification,
}

pub fn add(args: &AddArgs, assistant: &mut Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = args.text.join(" ");
    let mut input = CreateTaskInput::new(raw);
    if let Some(title) = &args.title {
        input = input.title(title.clone());
    }
    if let Some(description) = &args.description {
        input = input.description(description.clone());
    }
    if let Some(parent) = &args.parent {
        input = input.parent(parent.clone());
    }
    if let Some(deadline) = &args.deadline {
        input = input.deadline(parse_when(assistant, deadline, "deadline")?);
    }
    if let Some(scheduled) = &args.scheduled {
        input = input.scheduled(parse_when(assistant, scheduled, "scheduled date")?);
    }
    if let Some(minutes) = args.estimate {
        input = input.estimate(minutes);
    }
    if let Some(priority) = &args.priority {
        let level: Priority = parse_enum(priority, "priority")?;
        input = input.priority(level, format!("Set to {level} on capture"));
    }
    for note in &args.note {
        input = input.note(note.clone());
    }

    let outcome = assistant.capture(input)?;
    output(&outcome, flags.format)
}

pub fn list(
    args: &ListArgs,
    assistant: &Assistant,
    config: &StrideConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut filter = TaskFilter::new()
        .statuses(parse_enums::<TaskStatus>(&args.status, "status")?)
        .priorities(parse_enums::<Priority>(&args.priority, "priority")?);
    if let Some(parent) = &args.parent {
        filter = filter.parent(parent.clone());
    }
    if let Some(day) = &args.on {
        let instant = parse_when(assistant, day, "day")?;
        filter = filter.scheduled_on(stride_core::calendar::local_date(instant));
    }

    let mut tasks = assistant.list(&filter);
    tasks.truncate(effective_limit(args.limit, config.general.default_limit));
    output(&tasks, flags.format)
}

pub fn get(id: &str, assistant: &Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    let task = assistant
        .get(id)
        .with_context(|| format!("task {id} not found"))?;
    let classification = assistant.classify(id)?;
    output(
        &TaskDetail {
            task,
            classification,
        },
        flags.format,
    )
}

pub fn update(
    args: &UpdateArgs,
    assistant: &mut Assistant,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut patch = TaskPatchBuilder::new();
    if let Some(title) = &args.title {
        patch = patch.title(title.clone());
    }
    if let Some(description) = &args.description {
        patch = patch.description(Some(description.clone()));
    }
    if let Some(deadline) = &args.deadline {
        patch = patch.deadline(Some(parse_when(assistant, deadline, "deadline")?));
    } else if args.clear_deadline {
        patch = patch.deadline(None);
    }
    if let Some(scheduled) = &args.scheduled {
        patch = patch.scheduled_date(Some(parse_when(assistant, scheduled, "scheduled date")?));
    } else if args.clear_scheduled {
        patch = patch.scheduled_date(None);
    }
    if let Some(minutes) = args.estimate {
        patch = patch.estimated_minutes(Some(minutes));
    }
    if let Some(status) = &args.status {
        patch = patch.status(parse_enum(status, "status")?);
    }
    if !args.note.is_empty() {
        patch = patch.notes(args.note.clone());
    }

    let outcome = assistant
        .update(&args.id, patch.build(), MutationIntent::from_flag(args.yes))
        .with_context(|| unconfirmed_hint(args.yes, &args.id))?;
    output(&outcome, flags.format)
}

pub fn complete(id: &str, assistant: &mut Assistant, flags: &GlobalFlags) -> anyhow::Result<()> {
    let outcome = assistant.complete(id)?;
    output(&outcome, flags.format)
}

pub fn defer(
    id: &str,
    until: Option<&str>,
    assistant: &mut Assistant,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let until = until
        .map(|raw| parse_when(assistant, raw, "deferral date"))
        .transpose()?;
    let outcome = assistant.defer(id, until)?;
    output(&outcome, flags.format)
}

pub fn delete(
    id: &str,
    yes: bool,
    assistant: &mut Assistant,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let removed = assistant
        .delete(id, MutationIntent::from_flag(yes))
        .with_context(|| unconfirmed_hint(yes, id))?;
    output(&removed, flags.format)
}

pub fn set_priority(
    id: &str,
    level: &str,
    assistant: &mut Assistant,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let level: Priority = parse_enum(level, "priority")?;
    let task = assistant.set_priority(id, level)?;
    output(&task, flags.format)
}

fn unconfirmed_hint(confirmed: bool, id: &str) -> String {
    if confirmed {
        format!("task {id} was not changed")
    } else {
        format!("task {id} was not changed (pass --yes to confirm)")
    }
}
