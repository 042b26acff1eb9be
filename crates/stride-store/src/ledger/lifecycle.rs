use chrono::{DateTime, Utc};
use serde_json::json;
use stride_core::calendar::at_hour;
use stride_core::entities::{HistoryEntry, Task};
use stride_core::enums::{HistoryAction, TaskStatus};
use stride_core::errors::CoreError;
use tracing::info;

use super::TaskStore;
use crate::error::StoreError;
use crate::updates::MutationIntent;

impl TaskStore {
    /// Mark a task completed. The record is kept.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`], a [`CoreError::InvalidTransition`] if
    /// the task is already completed or archived, or a persistence error.
    pub fn complete(&mut self, id: &str) -> Result<Task, StoreError> {
        let mut task = self.require(id)?.clone();
        check_transition(&task, TaskStatus::Completed)?;

        let now = self.clock.now();
        let previous = task.status;
        task.status = TaskStatus::Completed;
        task.record(
            HistoryEntry::new(now, HistoryAction::Completed, "Task completed")
                .with_change(json!(previous), json!(task.status)),
        );
        self.commit(vec![task.clone()], None)?;
        info!(id, "completed task");
        Ok(task)
    }

    /// Defer a task to `until`, or to tomorrow at the defer hour (09:00 local
    /// by default) when no date is given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`], a [`CoreError::InvalidTransition`] for
    /// completed or archived tasks, or a persistence error.
    pub fn defer(&mut self, id: &str, until: Option<DateTime<Utc>>) -> Result<Task, StoreError> {
        let mut task = self.require(id)?.clone();
        check_transition(&task, TaskStatus::Deferred)?;

        let now = self.clock.now();
        let target = match until {
            Some(instant) => instant,
            None => {
                let tomorrow = self.clock.today().succ_opt().ok_or_else(|| {
                    CoreError::Validation("no calendar day after today".to_string())
                })?;
                at_hour(tomorrow, self.defer_hour)
            }
        };

        let previous = task.scheduled_date;
        task.status = TaskStatus::Deferred;
        task.scheduled_date = Some(target);
        task.record(
            HistoryEntry::new(
                now,
                HistoryAction::Deferred,
                format!("Deferred to {}", target.to_rfc3339()),
            )
            .with_change(json!(previous), json!(target)),
        );
        self.commit(vec![task.clone()], None)?;
        info!(id, until = %target, "deferred task");
        Ok(task)
    }

    /// Remove a task. Its parent's `child_ids` is pruned (and the change
    /// recorded there); its own children are left in place as orphans.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ExplicitRequired`] for an implicit request,
    /// [`StoreError::NotFound`], or a persistence error.
    pub fn delete(&mut self, id: &str, intent: MutationIntent) -> Result<Task, StoreError> {
        if !intent.is_explicit() {
            return Err(StoreError::ExplicitRequired {
                operation: "delete",
                id: id.to_string(),
            });
        }

        let task = self.require(id)?.clone();
        let mut upserts = Vec::with_capacity(1);
        if let Some(mut parent) = task.parent_id.as_deref().and_then(|p| self.get(p)).cloned() {
            let previous = json!(parent.child_ids);
            parent.child_ids.retain(|child| child != id);
            let entry = HistoryEntry::new(
                self.clock.now(),
                HistoryAction::Updated,
                format!("Removed child task {id}"),
            )
            .with_change(previous, json!(parent.child_ids));
            parent.record(entry);
            upserts.push(parent);
        }

        self.commit(upserts, Some(id))?;
        info!(id, orphaned = task.child_ids.len(), "deleted task");
        Ok(task)
    }
}

fn check_transition(task: &Task, next: TaskStatus) -> Result<(), CoreError> {
    if task.status.can_transition_to(next) {
        return Ok(());
    }
    Err(CoreError::InvalidTransition {
        kind: "task",
        id: task.id.clone(),
        from: task.status.to_string(),
        to: next.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local, TimeZone, Timelike};
    use pretty_assertions::assert_eq;
    use stride_core::calendar::local_date;
    use stride_core::clock::Clock;
    use stride_core::enums::{HistoryAction, TaskStatus};
    use stride_core::errors::CoreError;

    use crate::error::StoreError;
    use crate::input::CreateTaskInput;
    use crate::test_support::helpers::test_store;
    use crate::updates::MutationIntent;

    #[test]
    fn complete_keeps_record_and_appends_once() {
        let (mut store, _clock) = test_store();
        let task = store.create(CreateTaskInput::new("send invoice")).unwrap();
        let done = store.complete(&task.id).unwrap();

        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(done.history.len(), 2);
        assert_eq!(done.history[1].action, HistoryAction::Completed);
        assert!(store.get(&task.id).is_some());
    }

    #[test]
    fn completing_twice_is_an_invalid_transition() {
        let (mut store, _clock) = test_store();
        let task = store.create(CreateTaskInput::new("x")).unwrap();
        store.complete(&task.id).unwrap();
        let err = store.complete(&task.id).unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::InvalidTransition { .. })));
        assert_eq!(store.get(&task.id).unwrap().history.len(), 2);
    }

    #[test]
    fn defer_without_date_lands_tomorrow_at_nine_local() {
        let (mut store, clock) = test_store();
        let task = store.create(CreateTaskInput::new("clean garage")).unwrap();
        let deferred = store.defer(&task.id, None).unwrap();

        let scheduled = deferred.scheduled_date.unwrap().with_timezone(&Local);
        assert_eq!(deferred.status, TaskStatus::Deferred);
        assert_eq!(scheduled.date_naive(), clock.today().succ_opt().unwrap());
        assert_eq!((scheduled.hour(), scheduled.minute()), (9, 0));
        assert_eq!(deferred.history.len(), 2);
        assert_eq!(deferred.history[1].action, HistoryAction::Deferred);
    }

    #[test]
    fn second_defer_uses_exact_date() {
        let (mut store, clock) = test_store();
        let task = store.create(CreateTaskInput::new("clean garage")).unwrap();
        store.defer(&task.id, None).unwrap();

        let target = Local
            .with_ymd_and_hms(2026, 3, 20, 14, 30, 0)
            .unwrap()
            .with_timezone(&chrono::Utc);
        let again = store.defer(&task.id, Some(target)).unwrap();
        assert_eq!(again.scheduled_date, Some(target));
        assert_eq!(again.history.len(), 3);
        assert!(local_date(target) > clock.today());
    }

    #[test]
    fn custom_defer_hour_is_respected() {
        let (store, _clock) = test_store();
        let mut store = store.with_defer_hour(7);
        let task = store.create(CreateTaskInput::new("run")).unwrap();
        let deferred = store.defer(&task.id, None).unwrap();
        assert_eq!(deferred.scheduled_date.unwrap().with_timezone(&Local).hour(), 7);
    }

    #[test]
    fn delete_requires_explicit_intent() {
        let (mut store, _clock) = test_store();
        let task = store.create(CreateTaskInput::new("x")).unwrap();
        let err = store.delete(&task.id, MutationIntent::Implicit).unwrap_err();
        assert!(matches!(err, StoreError::ExplicitRequired { operation: "delete", .. }));
        assert_eq!(store.get(&task.id).unwrap(), &task);
    }

    #[test]
    fn delete_prunes_parent_and_orphans_children() {
        let (mut store, clock) = test_store();
        let root = store.create(CreateTaskInput::new("move house")).unwrap();
        let middle = store.create(CreateTaskInput::new("pack kitchen").parent(&root.id)).unwrap();
        clock.advance(Duration::minutes(1));
        let leaf = store.create(CreateTaskInput::new("buy boxes").parent(&middle.id)).unwrap();

        let removed = store.delete(&middle.id, MutationIntent::Explicit).unwrap();
        assert_eq!(removed.id, middle.id);
        assert!(store.get(&middle.id).is_none());

        let root = store.get(&root.id).unwrap();
        assert!(root.child_ids.is_empty());
        assert_eq!(root.history.last().unwrap().details, format!("Removed child task {}", middle.id));

        let leaf_after = store.get(&leaf.id).unwrap();
        assert_eq!(leaf_after, &leaf);
        let orphan_ids: Vec<String> = store.orphans().into_iter().map(|t| t.id).collect();
        assert_eq!(orphan_ids, vec![leaf.id]);
    }
}
