//! # stride-engine
//!
//! Decision logic for Stride: natural-language dates, priority scoring, task
//! decomposition, daily plans, streaks, and reminders.
//!
//! Every engine is a plain value constructed once and passed where it is
//! needed; time always comes from the store's [`stride_core::clock::Clock`].
//! [`Assistant`] wires them to a [`stride_store::TaskStore`] and is the
//! entry point for applications.

pub mod assistant;
pub mod atomize;
pub mod celebrate;
pub mod dates;
pub mod error;
pub mod notify;
pub mod plan;
pub mod priority;
pub mod streak;
mod test_support;

pub use assistant::{Assistant, Atomized, Outcome};
pub use atomize::{AtomizeOptions, AtomizeResult, Atomizer, DecompositionSource, MicroTask};
pub use dates::{DateMatcher, DeadlineMatch, NaturalDateParser, ParsedDate};
pub use error::EngineError;
pub use notify::NotificationPlanner;
pub use plan::{AdaptTrigger, DayPlan, PlanAdaptation, PlanChange, PlanChangeKind, PlanManager};
pub use priority::{
    Classification, PriorityEngine, PriorityWeights, get_next_task, prioritize_tasks,
};
