//! Priority classification and ordering.
//!
//! A task's score is a weighted average of four factors, each scored 0-100:
//!
//! | Factor    | Weight | Rule |
//! |-----------|--------|------|
//! | deadline  | 50     | none 30; overdue or within 24h 100; within 7 days 90 falling 3 per day; later `max(20, 60 - days)` |
//! | priority  | 30     | high 100, medium 50, low 20 |
//! | age       | 10     | `min(100, 30 + 10 * whole days)` |
//! | hierarchy | 10     | has children 70, is a child 50, standalone 40 |
//!
//! Scores of 70+ are high, 40+ medium, the rest low. A deadline that is overdue
//! or within 24 hours always classifies as high.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use stride_core::entities::Task;
use stride_core::enums::Priority;
use stride_store::CreateTaskInput;
use tracing::debug;

const HIGH_THRESHOLD: f64 = 70.0;
const MEDIUM_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriorityWeights {
    pub deadline: u32,
    pub priority: u32,
    pub age: u32,
    pub hierarchy: u32,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            deadline: 50,
            priority: 30,
            age: 10,
            hierarchy: 10,
        }
    }
}

impl PriorityWeights {
    const fn total(&self) -> u32 {
        self.deadline + self.priority + self.age + self.hierarchy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Deadline,
    Priority,
    Age,
    Hierarchy,
}

/// One factor's contribution to a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityFactor {
    pub kind: FactorKind,
    pub weight: u32,
    pub value: u32,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub level: Priority,
    pub reason: String,
    /// Weighted score in `[0, 100]`.
    pub score: f64,
    pub factors: Vec<PriorityFactor>,
}

/// The inputs classification reads. Built from a stored task or from input
/// that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrioritySignals {
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub has_children: bool,
    pub has_parent: bool,
}

impl PrioritySignals {
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            deadline: task.deadline,
            priority: task.priority,
            created_at: task.created_at,
            has_children: task.has_children(),
            has_parent: task.is_child(),
        }
    }

    /// Signals for a task about to be created at `now`.
    #[must_use]
    pub fn from_input(input: &CreateTaskInput, now: DateTime<Utc>) -> Self {
        Self {
            deadline: input.deadline,
            priority: input.priority.unwrap_or(Priority::Medium),
            created_at: now,
            has_children: false,
            has_parent: input.parent_id.is_some(),
        }
    }
}

/// How close a deadline is, bucketed the way the score and reason need it.
enum Urgency {
    None,
    Overdue { days: i64 },
    WithinDay,
    ThisWeek { days: i64 },
    Later { days: i64 },
}

impl Urgency {
    fn of(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(deadline) = deadline else {
            return Self::None;
        };
        let remaining = deadline - now;
        if remaining < Duration::zero() {
            return Self::Overdue {
                days: (-remaining).num_days(),
            };
        }
        if remaining <= Duration::hours(24) {
            return Self::WithinDay;
        }
        // Partial days round up: 30 hours out is "due in 2 days".
        let days = (remaining.num_hours() + 23) / 24;
        if days <= 7 {
            Self::ThisWeek { days }
        } else {
            Self::Later { days }
        }
    }

    const fn forces_high(&self) -> bool {
        matches!(self, Self::Overdue { .. } | Self::WithinDay)
    }

    fn score(&self) -> u32 {
        match *self {
            Self::None => 30,
            Self::Overdue { .. } | Self::WithinDay => 100,
            Self::ThisWeek { days } => clamp_score(90 - (days - 1) * 3),
            Self::Later { days } => clamp_score((60 - days).max(20)),
        }
    }

    fn explanation(&self) -> Option<String> {
        match *self {
            Self::None | Self::Later { .. } => None,
            Self::Overdue { days: 0 } => Some("Overdue".to_string()),
            Self::Overdue { days } => Some(format!("Overdue by {days} {}", days_label(days))),
            Self::WithinDay => Some("Due within 24 hours".to_string()),
            Self::ThisWeek { days } => Some(format!("Due in {days} {}", days_label(days))),
        }
    }
}

fn clamp_score(value: i64) -> u32 {
    u32::try_from(value.clamp(0, 100)).unwrap_or(0)
}

const fn days_label(n: i64) -> &'static str {
    if n == 1 { "day" } else { "days" }
}

/// Scores tasks and turns scores into priority levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityEngine {
    weights: PriorityWeights,
}

impl PriorityEngine {
    #[must_use]
    pub const fn new(weights: PriorityWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> PriorityWeights {
        self.weights
    }

    #[must_use]
    pub fn classify_task(&self, task: &Task, now: DateTime<Utc>) -> Classification {
        self.classify(&PrioritySignals::from_task(task), now)
    }

    #[must_use]
    pub fn classify(&self, signals: &PrioritySignals, now: DateTime<Utc>) -> Classification {
        let urgency = Urgency::of(signals.deadline, now);
        let age_days = (now - signals.created_at).num_days().max(0);

        let factors = vec![
            PriorityFactor {
                kind: FactorKind::Deadline,
                weight: self.weights.deadline,
                value: urgency.score(),
                explanation: urgency
                    .explanation()
                    .unwrap_or_else(|| deadline_summary(signals.deadline, now)),
            },
            PriorityFactor {
                kind: FactorKind::Priority,
                weight: self.weights.priority,
                value: priority_score(signals.priority),
                explanation: format!("Currently {}", signals.priority),
            },
            PriorityFactor {
                kind: FactorKind::Age,
                weight: self.weights.age,
                value: clamp_score(30 + age_days * 10),
                explanation: format!("Created {age_days} {} ago", days_label(age_days)),
            },
            PriorityFactor {
                kind: FactorKind::Hierarchy,
                weight: self.weights.hierarchy,
                value: hierarchy_score(signals),
                explanation: hierarchy_summary(signals).to_string(),
            },
        ];

        let total = f64::from(self.weights.total().max(1));
        let weighted: f64 = factors
            .iter()
            .map(|f| f64::from(f.weight) * f64::from(f.value))
            .sum();
        let score = weighted / total;

        let level = if urgency.forces_high() || score >= HIGH_THRESHOLD {
            Priority::High
        } else if score >= MEDIUM_THRESHOLD {
            Priority::Medium
        } else {
            Priority::Low
        };
        let reason = urgency
            .explanation()
            .unwrap_or_else(|| generic_reason(level).to_string());

        debug!(%level, score, %reason, "classified task");
        Classification {
            level,
            reason,
            score,
            factors,
        }
    }
}

const fn priority_score(priority: Priority) -> u32 {
    match priority {
        Priority::High => 100,
        Priority::Medium => 50,
        Priority::Low => 20,
    }
}

const fn hierarchy_score(signals: &PrioritySignals) -> u32 {
    if signals.has_children {
        70
    } else if signals.has_parent {
        50
    } else {
        40
    }
}

const fn hierarchy_summary(signals: &PrioritySignals) -> &'static str {
    if signals.has_children {
        "Has subtasks"
    } else if signals.has_parent {
        "Subtask of a larger goal"
    } else {
        "Standalone task"
    }
}

fn deadline_summary(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    deadline.map_or_else(
        || "No deadline".to_string(),
        |d| format!("Due in {} days", (d - now).num_days()),
    )
}

const fn generic_reason(level: Priority) -> &'static str {
    match level {
        Priority::High => "High priority based on importance and urgency",
        Priority::Medium => "Moderate urgency; worth scheduling soon",
        Priority::Low => "No pressing deadline; low urgency",
    }
}

/// Stable sort: high before medium before low, then earlier deadline first
/// (tasks with a deadline before those without), then older first.
#[must_use]
pub fn prioritize_tasks(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        a.priority
            .urgency_rank()
            .cmp(&b.priority.urgency_rank())
            .then_with(|| match (a.deadline, b.deadline) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    tasks
}

/// The single task to work on now: the head of the actionable (pending or
/// in-progress) tasks in priority order.
#[must_use]
pub fn get_next_task(tasks: &[Task]) -> Option<Task> {
    let actionable: Vec<Task> = tasks
        .iter()
        .filter(|task| task.status.is_actionable())
        .cloned()
        .collect();
    prioritize_tasks(actionable).into_iter().next()
}
