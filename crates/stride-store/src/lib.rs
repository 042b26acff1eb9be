//! # stride-store
//!
//! The task ledger for Stride.
//!
//! [`TaskStore`] holds every task and enforces the ledger rules:
//! - creation always appends exactly one `created` history entry
//! - `update` and `delete` require [`MutationIntent::Explicit`]; an implicit
//!   request is rejected with nothing changed
//! - every mutation appends history; deletion is the only destructive operation
//! - parent and child links are kept in both directions, and deletion never
//!   cascades
//!
//! Durable storage sits behind [`RecordStore`], with a JSONL-file backend and
//! an in-memory one.

pub mod backend;
pub mod error;
pub mod filter;
pub mod input;
pub mod ledger;
pub mod preferences;
mod test_support;
pub mod updates;

pub use backend::{JsonlRecordStore, MemoryRecordStore, RecordStore};
pub use error::StoreError;
pub use filter::TaskFilter;
pub use input::CreateTaskInput;
pub use ledger::{DEFAULT_DEFER_HOUR, LEDGER_EXPORT_VERSION, LedgerExport, TaskStore};
pub use preferences::PreferencesStore;
pub use updates::{MutationIntent, TaskPatch, TaskPatchBuilder};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use stride_core::clock::{Clock, ManualClock};
    use stride_core::enums::{Priority, TaskStatus};

    use super::*;
    use crate::test_support::helpers::{monday_morning, test_store};

    #[test]
    fn jsonl_ledger_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.jsonl");
        let clock = Arc::new(ManualClock::new(monday_morning()));

        let mut store =
            TaskStore::open(Box::new(JsonlRecordStore::new(&path)), clock.clone()).unwrap();
        let parent = store
            .create(CreateTaskInput::new("plan trip").deadline(clock.now() + Duration::days(10)))
            .unwrap();
        let child = store.create(CreateTaskInput::new("book flights").parent(&parent.id)).unwrap();
        store.complete(&child.id).unwrap();

        let reopened = TaskStore::open(Box::new(JsonlRecordStore::new(&path)), clock).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(&parent.id), store.get(&parent.id));
        assert_eq!(reopened.get(&child.id).unwrap().status, TaskStatus::Completed);
    }

    #[test]
    fn filters_combine_with_and() {
        let (mut store, clock) = test_store();
        let parent = store.create(CreateTaskInput::new("garden")).unwrap();
        let tomorrow = clock.now() + Duration::days(1);
        store
            .create(
                CreateTaskInput::new("buy seeds")
                    .parent(&parent.id)
                    .priority(Priority::High, "Due in 1 days")
                    .scheduled(tomorrow),
            )
            .unwrap();
        store
            .create(CreateTaskInput::new("water beds").parent(&parent.id).scheduled(tomorrow))
            .unwrap();

        let by_parent = store.get_all(&TaskFilter::new().parent(&parent.id));
        assert_eq!(by_parent.len(), 2);

        let high_children = store.get_all(
            &TaskFilter::new()
                .parent(&parent.id)
                .priorities([Priority::High]),
        );
        assert_eq!(high_children.len(), 1);
        assert_eq!(high_children[0].title, "buy seeds");

        let on_day = store.get_all(
            &TaskFilter::new().scheduled_on(stride_core::calendar::local_date(tomorrow)),
        );
        assert_eq!(on_day.len(), 2);

        let window = store.get_all(
            &TaskFilter::new()
                .between(clock.now(), clock.now() + Duration::hours(12))
                .statuses([TaskStatus::Pending]),
        );
        assert!(window.is_empty());
    }

    #[test]
    fn get_all_orders_by_creation() {
        let (mut store, clock) = test_store();
        for title in ["first", "second", "third"] {
            store.create(CreateTaskInput::new(title)).unwrap();
            clock.advance(Duration::seconds(1));
        }
        let titles: Vec<String> = store
            .get_all(&TaskFilter::default())
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }
}
