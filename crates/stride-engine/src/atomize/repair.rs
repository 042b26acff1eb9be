//! Field-by-field repair of a model's decomposition.
//!
//! Nothing here rejects a response outright: bad durations become the
//! default, bad dependency indices are dropped, and untitled steps are
//! skipped. Only a response with no usable step at all yields `None`.

use serde_json::Value;

use super::verbs::enforce_verb;
use super::{DEFAULT_STEP_MINUTES, MicroTask, clamp_minutes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub steps: Vec<MicroTask>,
    pub mvp_suggestion: Option<String>,
}

/// Turn raw model output into at most `max_steps` valid micro-tasks.
#[must_use]
pub fn repair(value: &Value, max_steps: usize) -> Option<Repaired> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        other => other.get("micro_tasks").and_then(Value::as_array).map(Vec::as_slice)?,
    };

    // Original index -> index in the kept list.
    let mut remap: Vec<Option<usize>> = vec![None; items.len()];
    let mut kept: Vec<(&Value, String)> = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if kept.len() == max_steps {
            break;
        }
        if let Some(title) = text_field(item, "title") {
            remap[index] = Some(kept.len());
            kept.push((item, title));
        }
    }
    if kept.is_empty() {
        return None;
    }

    let steps = kept
        .into_iter()
        .enumerate()
        .map(|(position, (item, title))| {
            let dependencies = dependencies(item, &remap, position);
            MicroTask {
                title: enforce_verb(&title),
                description: text_field(item, "description"),
                estimated_minutes: minutes(item),
                parallelizable: dependencies.is_empty(),
                dependencies,
            }
        })
        .collect();

    let mvp_suggestion = match value {
        Value::Object(_) => text_field(value, "mvp_suggestion"),
        _ => None,
    };
    Some(Repaired {
        steps,
        mvp_suggestion,
    })
}

fn text_field(item: &Value, field: &str) -> Option<String> {
    item.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Missing, non-numeric, zero, or negative durations become the default;
/// everything is then clamped into the step bounds.
fn minutes(item: &Value) -> u32 {
    let raw = match item.get("estimated_minutes") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(raw) = raw.filter(|m| m.is_finite() && *m > 0.0) else {
        return DEFAULT_STEP_MINUTES;
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // Bounded before the cast.
    let rounded = raw.round().clamp(1.0, 1_000.0) as u32;
    clamp_minutes(rounded)
}

/// Valid, de-duplicated dependency positions, excluding self-references and
/// references to dropped steps.
fn dependencies(item: &Value, remap: &[Option<usize>], position: usize) -> Vec<usize> {
    let Some(raw) = item.get("dependencies").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut deps: Vec<usize> = raw
        .iter()
        .filter_map(Value::as_u64)
        .filter_map(|i| usize::try_from(i).ok())
        .filter_map(|i| remap.get(i).copied().flatten())
        .filter(|&i| i != position)
        .collect();
    deps.sort_unstable();
    deps.dedup();
    deps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomize::verbs::{ACTION_VERBS, starts_with_verb};
    use crate::atomize::{MAX_STEP_MINUTES, MIN_STEP_MINUTES};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn any_title() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("   ".to_string()),
            "[0-9]{1,6}",
            "[!?.,;:#-]{1,3}[a-z ]{0,12}",
            "[A-Za-z][a-z ]{0,20}",
            (prop::sample::select(ACTION_VERBS), "[a-z ]{0,12}")
                .prop_map(|(verb, rest)| format!("{verb} {rest}")),
        ]
    }

    fn any_minutes() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<u64>().prop_map(Value::from),
            any::<f64>().prop_map(|f| serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)),
            prop::sample::select(vec!["NaN", "inf", "-inf", "-3", "45", "1e9", "soon", ""])
                .prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            Just(Value::Null),
        ]
    }

    fn any_dependencies() -> impl Strategy<Value = Value> {
        proptest::collection::vec(
            prop_oneof![
                (0u64..16).prop_map(Value::from),
                (-5i64..0).prop_map(Value::from),
                Just(json!("1")),
                Just(json!(1.5)),
            ],
            0..5,
        )
        .prop_map(Value::Array)
    }

    fn any_step() -> impl Strategy<Value = Value> {
        (any_title(), any_minutes(), any_dependencies()).prop_map(|(title, minutes, deps)| {
            json!({"title": title, "estimated_minutes": minutes, "dependencies": deps})
        })
    }

    proptest! {
        #[test]
        fn repaired_steps_stay_within_bounds(
            items in proptest::collection::vec(any_step(), 0..12),
            max_steps in 1usize..9,
        ) {
            let usable = items
                .iter()
                .filter(|item| item["title"].as_str().is_some_and(|t| !t.trim().is_empty()))
                .count();
            let repaired = repair(&json!({"micro_tasks": items}), max_steps);
            prop_assert_eq!(repaired.is_some(), usable > 0);
            let Some(repaired) = repaired else {
                return Ok(());
            };

            let steps = repaired.steps;
            prop_assert_eq!(steps.len(), usable.min(max_steps));
            for (position, step) in steps.iter().enumerate() {
                prop_assert!((MIN_STEP_MINUTES..=MAX_STEP_MINUTES).contains(&step.estimated_minutes));
                prop_assert!(starts_with_verb(&step.title), "not verb-led: {:?}", step.title);
                prop_assert!(step.dependencies.iter().all(|&d| d < steps.len() && d != position));
                prop_assert!(step.dependencies.windows(2).all(|pair| pair[0] < pair[1]));
                prop_assert_eq!(step.parallelizable, step.dependencies.is_empty());
            }
        }
    }

    #[test]
    fn clean_response_passes_through() {
        let value = json!({
            "micro_tasks": [
                {"title": "Gather Q1 numbers", "estimated_minutes": 30, "dependencies": []},
                {"title": "Draft summary", "estimated_minutes": 45, "dependencies": [0]}
            ],
            "mvp_suggestion": "Draft the summary paragraph"
        });
        let repaired = repair(&value, 7).unwrap();
        assert_eq!(repaired.steps.len(), 2);
        assert_eq!(repaired.steps[1].dependencies, vec![0]);
        assert!(repaired.steps[0].parallelizable);
        assert!(!repaired.steps[1].parallelizable);
        assert_eq!(repaired.mvp_suggestion.as_deref(), Some("Draft the summary paragraph"));
    }

    #[test]
    fn durations_are_defaulted_and_clamped() {
        let value = json!({"micro_tasks": [
            {"title": "Outline", "estimated_minutes": -5},
            {"title": "Outline", "estimated_minutes": 240},
            {"title": "Outline", "estimated_minutes": 3},
            {"title": "Outline"},
            {"title": "Outline", "estimated_minutes": "20"},
            {"title": "Outline", "estimated_minutes": 0}
        ]});
        let minutes: Vec<u32> = repair(&value, 10)
            .unwrap()
            .steps
            .iter()
            .map(|s| s.estimated_minutes)
            .collect();
        assert_eq!(minutes, vec![30, 60, 15, 30, 20, 30]);
    }

    #[test]
    fn bad_dependencies_are_dropped() {
        let value = json!({"micro_tasks": [
            {"title": "Book venue", "dependencies": [0, 7, -1, "x"]},
            {"title": "", "dependencies": []},
            {"title": "Send invites", "dependencies": [1, 0, 0]},
            {"title": "Order food", "dependencies": null}
        ]});
        let steps = repair(&value, 10).unwrap().steps;
        assert_eq!(steps.len(), 3);
        assert!(steps[0].dependencies.is_empty());
        assert_eq!(steps[1].dependencies, vec![0]);
        assert!(steps[2].dependencies.is_empty());
        assert!(steps[2].parallelizable);
    }

    #[test]
    fn step_count_is_capped_and_dangling_deps_removed() {
        let value = json!({"micro_tasks": [
            {"title": "A step"}, {"title": "B step", "dependencies": [2]}, {"title": "C step"}
        ]});
        let steps = repair(&value, 2).unwrap().steps;
        assert_eq!(steps.len(), 2);
        assert!(steps[1].dependencies.is_empty());
    }

    #[test]
    fn titles_are_verb_led() {
        let value = json!([{"title": "quarterly report intro"}]);
        let steps = repair(&value, 5).unwrap().steps;
        assert_eq!(steps[0].title, "Write quarterly report intro");
    }

    #[test]
    fn nothing_usable_is_none() {
        assert_eq!(repair(&json!({"micro_tasks": []}), 5), None);
        assert_eq!(repair(&json!({"micro_tasks": [{"title": "  "}]}), 5), None);
        assert_eq!(repair(&json!({"steps": []}), 5), None);
        assert_eq!(repair(&json!("nope"), 5), None);
    }
}
