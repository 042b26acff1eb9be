//! Daily and weekly plans, and plan adaptation.
//!
//! A task belongs to a day when its scheduled date, or failing that its
//! deadline, falls on that local calendar date. Archived tasks never appear in
//! a plan.

use chrono::{Days, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use stride_core::calendar::{end_of_day, local_instant, start_of_day};
use stride_core::entities::Task;
use stride_core::enums::{Priority, TaskStatus, Tone};
use stride_store::{MutationIntent, StoreError, TaskFilter, TaskPatchBuilder, TaskStore};
use tracing::{debug, info};

use crate::celebrate::celebration_message;
use crate::priority::{PriorityEngine, get_next_task, prioritize_tasks};
use crate::streak::current_streak;

/// Default cap on the tasks shown for today.
pub const DEFAULT_TODAY_LIMIT: usize = 7;

const DEFAULT_EXPLANATION: &str = "Plan updated.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    /// Every task of the day that is not completed, in priority order.
    pub tasks: Vec<Task>,
    pub completed_count: usize,
    pub total_count: usize,
}

/// What happened that may call for a plan change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptTrigger {
    TaskCompleted { task_id: String },
    TaskDeferred { task_id: String },
    NewTask { task_id: String },
    DeadlineChanged { task_id: String },
    TimePassed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanChangeKind {
    Rescheduled,
    Reprioritized,
    Promoted,
    Recommended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanChange {
    pub kind: PlanChangeKind,
    pub task_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanAdaptation {
    pub changes: Vec<PlanChange>,
    /// Never empty.
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_task: Option<Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebration: Option<String>,
}

impl PlanAdaptation {
    /// No changes, default explanation.
    #[must_use]
    pub fn unchanged() -> Self {
        Self::new(Vec::new(), &[])
    }

    fn new(changes: Vec<PlanChange>, notes: &[String]) -> Self {
        let explanation = if notes.is_empty() {
            DEFAULT_EXPLANATION.to_string()
        } else {
            notes.join(" ")
        };
        Self {
            changes,
            explanation,
            next_task: None,
            celebration: None,
        }
    }
}

/// Builds plans from the ledger and reacts to triggers.
#[derive(Debug, Clone, Copy)]
pub struct PlanManager {
    engine: PriorityEngine,
    today_limit: usize,
    tone: Tone,
}

impl Default for PlanManager {
    fn default() -> Self {
        Self::new(PriorityEngine::default())
    }
}

impl PlanManager {
    #[must_use]
    pub const fn new(engine: PriorityEngine) -> Self {
        Self {
            engine,
            today_limit: DEFAULT_TODAY_LIMIT,
            tone: Tone::Encouraging,
        }
    }

    #[must_use]
    pub const fn with_today_limit(mut self, limit: usize) -> Self {
        self.today_limit = limit;
        self
    }

    #[must_use]
    pub const fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    #[must_use]
    pub fn day_plan(&self, store: &TaskStore, date: NaiveDate) -> DayPlan {
        let filter = TaskFilter::new().between(start_of_day(date), end_of_day(date));
        let day: Vec<Task> = store
            .get_all(&filter)
            .into_iter()
            .filter(|task| task.status != TaskStatus::Archived)
            .collect();
        let total_count = day.len();
        let (completed, open): (Vec<Task>, Vec<Task>) = day
            .into_iter()
            .partition(|task| task.status == TaskStatus::Completed);
        DayPlan {
            date,
            tasks: prioritize_tasks(open),
            completed_count: completed.len(),
            total_count,
        }
    }

    #[must_use]
    pub fn today_plan(&self, store: &TaskStore) -> DayPlan {
        self.day_plan(store, store.clock().today())
    }

    /// Today's plan, truncated to the display limit.
    #[must_use]
    pub fn today_tasks(&self, store: &TaskStore) -> Vec<Task> {
        let mut tasks = self.today_plan(store).tasks;
        tasks.truncate(self.today_limit);
        tasks
    }

    /// Seven consecutive daily plans starting today.
    #[must_use]
    pub fn week_plan(&self, store: &TaskStore) -> Vec<DayPlan> {
        let today = store.clock().today();
        (0..7)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .map(|date| self.day_plan(store, date))
            .collect()
    }

    #[must_use]
    pub fn current_streak(&self, store: &TaskStore) -> u32 {
        current_streak(&store.get_all(&TaskFilter::new()), store.clock().today())
    }

    /// React to `trigger`.
    ///
    /// Only `deadline_changed` (when the level moves) and `time_passed` write to
    /// the ledger; the other triggers narrate.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the trigger names an unknown task, or
    /// a persistence error from a write.
    pub fn adapt_plan(
        &self,
        store: &mut TaskStore,
        trigger: &AdaptTrigger,
    ) -> Result<PlanAdaptation, StoreError> {
        debug!(?trigger, "adapting plan");
        match trigger {
            AdaptTrigger::TaskCompleted { task_id } => self.on_completed(store, task_id),
            AdaptTrigger::TaskDeferred { task_id } => Self::on_deferred(store, task_id),
            AdaptTrigger::NewTask { task_id } => Self::on_new_task(store, task_id),
            AdaptTrigger::DeadlineChanged { task_id } => self.on_deadline_changed(store, task_id),
            AdaptTrigger::TimePassed => Self::on_time_passed(store),
        }
    }

    fn on_completed(&self, store: &TaskStore, task_id: &str) -> Result<PlanAdaptation, StoreError> {
        let done = store.require(task_id)?;
        let all = store.get_all(&TaskFilter::new());
        let completed_total = all
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count();
        let celebration = celebration_message(completed_total, self.tone).to_string();

        let next = get_next_task(&all);
        let (changes, notes) = match &next {
            Some(task) => (
                vec![PlanChange {
                    kind: PlanChangeKind::Recommended,
                    task_id: task.id.clone(),
                    description: format!("Up next: \"{}\"", task.title),
                }],
                vec![format!(
                    "\"{}\" is done. Up next: \"{}\".",
                    done.title, task.title
                )],
            ),
            None => (
                Vec::new(),
                vec![format!(
                    "\"{}\" is done. Nothing else is waiting, you're all caught up!",
                    done.title
                )],
            ),
        };

        let mut adaptation = PlanAdaptation::new(changes, &notes);
        adaptation.next_task = next;
        adaptation.celebration = Some(celebration);
        Ok(adaptation)
    }

    fn on_deferred(store: &TaskStore, task_id: &str) -> Result<PlanAdaptation, StoreError> {
        let task = store.require(task_id)?;
        let when = task.scheduled_date.map_or_else(
            || "later".to_string(),
            |date| date.with_timezone(&chrono::Local).format("%A %-d %B").to_string(),
        );
        let change = PlanChange {
            kind: PlanChangeKind::Rescheduled,
            task_id: task.id.clone(),
            description: format!("Moved \"{}\" to {when}", task.title),
        };
        let note = format!(
            "No problem, \"{}\" is moved to {when}. Focus on what you can do today.",
            task.title
        );
        let mut adaptation = PlanAdaptation::new(vec![change], &[note]);
        adaptation.next_task = get_next_task(&store.get_all(&TaskFilter::new()));
        Ok(adaptation)
    }

    fn on_new_task(store: &TaskStore, task_id: &str) -> Result<PlanAdaptation, StoreError> {
        let task = store.require(task_id)?;
        let (changes, notes) = if task.priority == Priority::High {
            (
                vec![PlanChange {
                    kind: PlanChangeKind::Promoted,
                    task_id: task.id.clone(),
                    description: format!("\"{}\" moves to the top of the list", task.title),
                }],
                vec![format!(
                    "\"{}\" is high priority ({}), so it goes to the top.",
                    task.title, task.priority_reason
                )],
            )
        } else {
            (Vec::new(), Vec::new())
        };
        let mut adaptation = PlanAdaptation::new(changes, &notes);
        adaptation.next_task = get_next_task(&store.get_all(&TaskFilter::new()));
        Ok(adaptation)
    }

    fn on_deadline_changed(
        &self,
        store: &mut TaskStore,
        task_id: &str,
    ) -> Result<PlanAdaptation, StoreError> {
        let task = store.require(task_id)?.clone();
        let classification = self.engine.classify_task(&task, store.clock().now());
        if classification.level == task.priority {
            return Ok(PlanAdaptation::new(Vec::new(), &[]));
        }

        let patch = TaskPatchBuilder::new()
            .priority(classification.level, classification.reason.clone())
            .build();
        store.update(task_id, patch, MutationIntent::Explicit)?;
        info!(
            id = task_id,
            from = %task.priority,
            to = %classification.level,
            "reprioritized after deadline change"
        );

        let description = format!(
            "\"{}\" changed from {} to {} priority: {}",
            task.title, task.priority, classification.level, classification.reason
        );
        let change = PlanChange {
            kind: PlanChangeKind::Reprioritized,
            task_id: task.id,
            description: description.clone(),
        };
        Ok(PlanAdaptation::new(vec![change], &[format!("{description}.")]))
    }

    fn on_time_passed(store: &mut TaskStore) -> Result<PlanAdaptation, StoreError> {
        let today = store.clock().today();
        let today_start = start_of_day(today);
        let stale: Vec<Task> = store
            .get_all(&TaskFilter::new())
            .into_iter()
            .filter(|task| !task.status.is_terminal())
            .filter(|task| task.scheduled_date.is_some_and(|date| date < today_start))
            .collect();

        let mut changes = Vec::with_capacity(stale.len());
        let mut notes = Vec::with_capacity(stale.len());
        for task in stale {
            let Some(previous) = task.scheduled_date else {
                continue;
            };
            let moved = same_time_on(previous, today);
            let patch = TaskPatchBuilder::new().scheduled_date(Some(moved)).build();
            store.update(&task.id, patch, MutationIntent::Explicit)?;
            let description = format!("Moved \"{}\" to today", task.title);
            notes.push(format!("{description}."));
            changes.push(PlanChange {
                kind: PlanChangeKind::Rescheduled,
                task_id: task.id,
                description,
            });
        }
        if !changes.is_empty() {
            info!(count = changes.len(), "rescheduled overdue tasks to today");
        }
        Ok(PlanAdaptation::new(changes, &notes))
    }
}

/// `instant`'s local wall-clock time, moved onto `date`.
fn same_time_on(instant: chrono::DateTime<Utc>, date: NaiveDate) -> chrono::DateTime<Utc> {
    let time = instant.with_timezone(&chrono::Local).time();
    local_instant(NaiveDateTime::new(date, time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, TimeZone};
    use pretty_assertions::assert_eq;
    use stride_core::calendar::local_date;
    use stride_core::clock::Clock;
    use stride_store::CreateTaskInput;

    use crate::test_support::helpers::{test_store, wednesday_at};

    fn add(store: &mut TaskStore, title: &str, input: CreateTaskInput) -> Task {
        store.create(input.title(title)).unwrap()
    }

    #[test]
    fn today_plan_counts_and_sorts() {
        let (mut store, _clock) = test_store();
        let today = wednesday_at(17);
        let low = add(
            &mut store,
            "Water plants",
            CreateTaskInput::new("water plants")
                .scheduled(today)
                .priority(Priority::Low, "whenever"),
        );
        let high = add(
            &mut store,
            "Pay rent",
            CreateTaskInput::new("pay rent")
                .deadline(today)
                .priority(Priority::High, "due today"),
        );
        let done = add(&mut store, "Stretch", CreateTaskInput::new("stretch").scheduled(today));
        store.complete(&done.id).unwrap();
        let tomorrow = today + Duration::days(1);
        add(&mut store, "Later", CreateTaskInput::new("later").scheduled(tomorrow));
        let archived = add(&mut store, "Old", CreateTaskInput::new("old").scheduled(today));
        store
            .update(
                &archived.id,
                TaskPatchBuilder::new().status(TaskStatus::Archived).build(),
                MutationIntent::Explicit,
            )
            .unwrap();

        let plan = PlanManager::default().today_plan(&store);
        assert_eq!(plan.total_count, 3);
        assert_eq!(plan.completed_count, 1);
        let ids: Vec<&str> = plan.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![high.id.as_str(), low.id.as_str()]);
    }

    #[test]
    fn today_tasks_respects_limit() {
        let (mut store, _clock) = test_store();
        for i in 0..10 {
            let input = CreateTaskInput::new("t").scheduled(wednesday_at(12));
            add(&mut store, &format!("Task {i}"), input);
        }
        let manager = PlanManager::default();
        assert_eq!(manager.today_plan(&store).tasks.len(), 10);
        assert_eq!(manager.today_tasks(&store).len(), 7);
        assert_eq!(manager.with_today_limit(3).today_tasks(&store).len(), 3);
    }

    #[test]
    fn week_plan_covers_seven_days_from_today() {
        let (mut store, _clock) = test_store();
        let friday = wednesday_at(12) + Duration::days(2);
        add(&mut store, "Friday", CreateTaskInput::new("f").deadline(friday));
        let week = PlanManager::default().week_plan(&store);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, local_date(wednesday_at(12)));
        assert_eq!(week[2].total_count, 1);
        assert!(week.iter().enumerate().all(|(i, day)| i == 2 || day.total_count == 0));
    }

    #[test]
    fn completion_recommends_next_and_celebrates() {
        let (mut store, _clock) = test_store();
        let a = add(&mut store, "Draft slides", CreateTaskInput::new("a"));
        let b = add(
            &mut store,
            "Book room",
            CreateTaskInput::new("b").priority(Priority::High, "soon"),
        );
        store.complete(&a.id).unwrap();

        let adaptation = PlanManager::default()
            .adapt_plan(&mut store, &AdaptTrigger::TaskCompleted { task_id: a.id.clone() })
            .unwrap();
        assert_eq!(adaptation.next_task.map(|t| t.id), Some(b.id.clone()));
        assert_eq!(adaptation.changes[0].kind, PlanChangeKind::Recommended);
        assert!(adaptation.explanation.contains("Up next: \"Book room\""));
        assert!(adaptation.celebration.is_some());
    }

    #[test]
    fn completion_with_nothing_left_says_so() {
        let (mut store, _clock) = test_store();
        let a = add(&mut store, "Only task", CreateTaskInput::new("a"));
        store.complete(&a.id).unwrap();
        let adaptation = PlanManager::default()
            .adapt_plan(&mut store, &AdaptTrigger::TaskCompleted { task_id: a.id })
            .unwrap();
        assert!(adaptation.next_task.is_none());
        assert!(adaptation.changes.is_empty());
        assert!(adaptation.explanation.contains("all caught up"));
    }

    #[test]
    fn deferral_is_narrated_as_reschedule() {
        let (mut store, _clock) = test_store();
        let a = add(&mut store, "Call bank", CreateTaskInput::new("a"));
        store.defer(&a.id, None).unwrap();
        let adaptation = PlanManager::default()
            .adapt_plan(&mut store, &AdaptTrigger::TaskDeferred { task_id: a.id.clone() })
            .unwrap();
        assert_eq!(adaptation.changes.len(), 1);
        assert_eq!(adaptation.changes[0].kind, PlanChangeKind::Rescheduled);
        assert!(adaptation.explanation.starts_with("No problem"));
    }

    #[test]
    fn new_high_task_is_promoted_without_writes() {
        let (mut store, _clock) = test_store();
        let low = add(&mut store, "Low", CreateTaskInput::new("l").priority(Priority::Low, "meh"));
        let high = add(
            &mut store,
            "Urgent",
            CreateTaskInput::new("u").priority(Priority::High, "Overdue"),
        );
        let manager = PlanManager::default();

        let promoted = manager
            .adapt_plan(&mut store, &AdaptTrigger::NewTask { task_id: high.id.clone() })
            .unwrap();
        assert_eq!(promoted.changes[0].kind, PlanChangeKind::Promoted);
        assert_eq!(store.get(&high.id).unwrap().history.len(), 1);

        let quiet = manager
            .adapt_plan(&mut store, &AdaptTrigger::NewTask { task_id: low.id })
            .unwrap();
        assert!(quiet.changes.is_empty());
        assert_eq!(quiet.explanation, "Plan updated.");
    }

    #[test]
    fn deadline_change_persists_only_when_level_moves() {
        let (mut store, clock) = test_store();
        let input = CreateTaskInput::new("s").priority(Priority::Low, "later");
        let task = add(&mut store, "Submit form", input);
        let patch = TaskPatchBuilder::new()
            .deadline(Some(clock.now() + Duration::hours(3)))
            .build();
        store.update(&task.id, patch, MutationIntent::Explicit).unwrap();
        let manager = PlanManager::default();
        let trigger = AdaptTrigger::DeadlineChanged { task_id: task.id.clone() };

        let first = manager.adapt_plan(&mut store, &trigger).unwrap();
        assert_eq!(first.changes[0].kind, PlanChangeKind::Reprioritized);
        let stored = store.get(&task.id).unwrap().clone();
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.priority_reason, "Due within 24 hours");

        let history_len = stored.history.len();
        let second = manager.adapt_plan(&mut store, &trigger).unwrap();
        assert!(second.changes.is_empty());
        assert_eq!(store.get(&task.id).unwrap().history.len(), history_len);
    }

    #[test]
    fn time_passed_moves_stale_schedules_to_today() {
        let (mut store, _clock) = test_store();
        let monday = Local
            .with_ymd_and_hms(2026, 3, 2, 14, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        let stale = add(&mut store, "Stale", CreateTaskInput::new("s").scheduled(monday));
        let done = add(&mut store, "Done", CreateTaskInput::new("d").scheduled(monday));
        store.complete(&done.id).unwrap();
        let fresh = add(&mut store, "Fresh", CreateTaskInput::new("f").scheduled(wednesday_at(8)));

        let adaptation = PlanManager::default()
            .adapt_plan(&mut store, &AdaptTrigger::TimePassed)
            .unwrap();
        assert_eq!(adaptation.changes.len(), 1);
        assert_eq!(adaptation.changes[0].task_id, stale.id);

        let moved = store.get(&stale.id).unwrap();
        let expected = Local
            .with_ymd_and_hms(2026, 3, 4, 14, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(moved.scheduled_date, Some(expected));
        assert_eq!(store.get(&done.id).unwrap().scheduled_date, Some(monday));
        assert_eq!(store.get(&fresh.id).unwrap().scheduled_date, Some(wednesday_at(8)));
    }

    #[test]
    fn quiet_time_passed_still_explains() {
        let (mut store, _clock) = test_store();
        let adaptation = PlanManager::default()
            .adapt_plan(&mut store, &AdaptTrigger::TimePassed)
            .unwrap();
        assert_eq!(adaptation.explanation, "Plan updated.");
    }

    #[test]
    fn unknown_task_is_not_found() {
        let (mut store, _clock) = test_store();
        let result = PlanManager::default()
            .adapt_plan(&mut store, &AdaptTrigger::NewTask { task_id: "tsk-00000000".into() });
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}
