//! # Ledger properties under arbitrary operation sequences
//!
//! Applies random sequences of assistant operations to a small ledger and
//! checks the invariants that must hold after every step:
//! - a task's history never shrinks
//! - implicit updates and deletions are rejected and leave no trace
//! - parents always list the children that point at them

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Local, TimeZone, Utc};
use proptest::prelude::*;
use stride_config::StrideConfig;
use stride_core::clock::{Clock, ManualClock};
use stride_core::enums::Priority;
use stride_engine::{Assistant, EngineError};
use stride_llm::DisabledGenerator;
use stride_store::{
    CreateTaskInput, MemoryRecordStore, MutationIntent, PreferencesStore, StoreError, TaskFilter,
    TaskPatchBuilder, TaskStore,
};

#[derive(Debug, Clone)]
enum Op {
    Capture { parent: Option<usize> },
    Update { target: usize, explicit: bool },
    Complete { target: usize },
    Defer { target: usize },
    Delete { target: usize, explicit: bool },
    SetPriority { target: usize },
    Advance { hours: i64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => proptest::option::of(0usize..8).prop_map(|parent| Op::Capture { parent }),
        2 => (0usize..8, any::<bool>()).prop_map(|(target, explicit)| Op::Update { target, explicit }),
        1 => (0usize..8).prop_map(|target| Op::Complete { target }),
        1 => (0usize..8).prop_map(|target| Op::Defer { target }),
        1 => (0usize..8, any::<bool>()).prop_map(|(target, explicit)| Op::Delete { target, explicit }),
        1 => (0usize..8).prop_map(|target| Op::SetPriority { target }),
        1 => (1i64..30).prop_map(|hours| Op::Advance { hours }),
    ]
}

fn fresh_assistant() -> (Assistant, Arc<ManualClock>) {
    let now = Local
        .with_ymd_and_hms(2026, 3, 4, 10, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    let clock = Arc::new(ManualClock::new(now));
    let store = TaskStore::open(Box::new(MemoryRecordStore::new()), clock.clone()).unwrap();
    let assistant = Assistant::new(
        store,
        PreferencesStore::memory(),
        Arc::new(DisabledGenerator),
        &StrideConfig::default(),
    )
    .unwrap();
    (assistant, clock)
}

fn history_lengths(assistant: &Assistant) -> HashMap<String, usize> {
    assistant
        .list(&TaskFilter::new())
        .into_iter()
        .map(|task| (task.id, task.history.len()))
        .collect()
}

fn is_rejected(result: &Result<impl Sized, EngineError>) -> bool {
    matches!(
        result,
        Err(EngineError::Store(StoreError::ExplicitRequired { .. }))
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ledger_invariants_hold(ops in prop::collection::vec(op(), 1..40)) {
        let (mut assistant, clock) = fresh_assistant();
        let mut ids: Vec<String> = Vec::new();
        let pick = |ids: &[String], i: usize| (!ids.is_empty()).then(|| ids[i % ids.len()].clone());

        for op in ops {
            let before = history_lengths(&assistant);
            match op {
                Op::Capture { parent } => {
                    let mut input = CreateTaskInput::new("tidy garage");
                    if let Some(parent_id) = parent.and_then(|p| pick(&ids, p)) {
                        if assistant.get(&parent_id).is_some() {
                            input = input.parent(parent_id);
                        }
                    }
                    let task = assistant.capture(input).unwrap().task;
                    ids.push(task.id);
                }
                Op::Update { target, explicit } => {
                    let Some(id) = pick(&ids, target) else { continue };
                    let patch = TaskPatchBuilder::new()
                        .title(format!("Tidy garage ({target})"))
                        .deadline(Some(clock.now() + Duration::days(2)))
                        .build();
                    let result = assistant.update(&id, patch, MutationIntent::from_flag(explicit));
                    if !explicit {
                        prop_assert!(is_rejected(&result));
                        prop_assert_eq!(history_lengths(&assistant), before.clone());
                    }
                }
                Op::Complete { target } => {
                    if let Some(id) = pick(&ids, target) {
                        let _ = assistant.complete(&id);
                    }
                }
                Op::Defer { target } => {
                    if let Some(id) = pick(&ids, target) {
                        let _ = assistant.defer(&id, None);
                    }
                }
                Op::Delete { target, explicit } => {
                    let Some(id) = pick(&ids, target) else { continue };
                    let result = assistant.delete(&id, MutationIntent::from_flag(explicit));
                    if explicit {
                        if result.is_ok() {
                            prop_assert!(assistant.get(&id).is_none());
                        }
                    } else {
                        prop_assert!(is_rejected(&result));
                        prop_assert_eq!(history_lengths(&assistant), before.clone());
                    }
                }
                Op::SetPriority { target } => {
                    if let Some(id) = pick(&ids, target) {
                        let _ = assistant.set_priority(&id, Priority::Low);
                    }
                }
                Op::Advance { hours } => {
                    clock.advance(Duration::hours(hours));
                    assistant.sweep().unwrap();
                }
            }

            let after = history_lengths(&assistant);
            for (id, len) in &before {
                if let Some(now_len) = after.get(id) {
                    prop_assert!(now_len >= len, "history of {} shrank", id);
                }
            }
            for task in assistant.list(&TaskFilter::new()) {
                if let Some(parent) = task.parent_id.as_deref().and_then(|p| assistant.get(p)) {
                    prop_assert!(parent.child_ids.contains(&task.id));
                }
            }
        }
    }
}
