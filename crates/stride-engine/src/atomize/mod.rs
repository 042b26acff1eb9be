//! Task decomposition into micro-tasks.
//!
//! [`Atomizer::atomize`] never fails. A task estimated at an hour or less is
//! wrapped as a single step without calling the model. Otherwise the model is
//! asked once, under a timeout, for a structured decomposition; any failure
//! falls back to the single-step result. Model output is repaired field by
//! field, so durations always land in 15-60 minutes and titles always open
//! with an action verb.

mod order;
mod prompt;
mod repair;
pub mod verbs;

pub use order::{DependencyEdge, EdgeKind, dependency_edges, execution_order, parallel_groups};
pub use prompt::{DecompositionShape, StepShape, build_messages, target_shape};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use stride_core::entities::{Preferences, Task};
use stride_llm::TextGenerator;
use tracing::{debug, warn};

use self::repair::repair;
use self::verbs::enforce_verb;

pub const MIN_STEP_MINUTES: u32 = 15;
pub const MAX_STEP_MINUTES: u32 = 60;
pub const DEFAULT_STEP_MINUTES: u32 = 30;

/// Tasks estimated at or below this are not decomposed.
pub const SINGLE_STEP_LIMIT_MINUTES: u32 = 60;

#[must_use]
pub fn clamp_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_STEP_MINUTES, MAX_STEP_MINUTES)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MicroTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub estimated_minutes: u32,
    /// Positions of steps that must finish first.
    pub dependencies: Vec<usize>,
    pub parallelizable: bool,
}

/// Where a decomposition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompositionSource {
    /// The model's answer, repaired.
    Model,
    /// The task was small enough to be one step.
    SingleTask,
    /// The model call failed or returned nothing usable.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtomizeResult {
    pub micro_tasks: Vec<MicroTask>,
    pub dependencies: Vec<DependencyEdge>,
    pub parallel_groups: Vec<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mvp_suggestion: Option<String>,
    pub source: DecompositionSource,
}

impl AtomizeResult {
    fn assemble(
        micro_tasks: Vec<MicroTask>,
        suggested_mvp: Option<String>,
        has_deadline: bool,
        source: DecompositionSource,
    ) -> Self {
        let mvp_suggestion = suggested_mvp.or_else(|| {
            micro_tasks
                .first()
                .filter(|_| has_deadline)
                .map(|first| format!("Complete \"{}\"", first.title))
        });
        Self {
            dependencies: dependency_edges(&micro_tasks),
            parallel_groups: parallel_groups(&micro_tasks),
            micro_tasks,
            mvp_suggestion,
            source,
        }
    }

    /// Step positions in an order that honours every dependency.
    #[must_use]
    pub fn execution_order(&self) -> Vec<usize> {
        execution_order(self.micro_tasks.len(), &self.dependencies)
    }

    /// Whether the task stays a single step (nothing to persist as children).
    #[must_use]
    pub fn is_single_step(&self) -> bool {
        self.source != DecompositionSource::Model
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AtomizeOptions {
    pub preferences: Preferences,
    /// Upper bound on the model call.
    pub timeout: Duration,
}

impl Default for AtomizeOptions {
    fn default() -> Self {
        Self {
            preferences: Preferences::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct Atomizer {
    generator: Arc<dyn TextGenerator>,
    options: AtomizeOptions,
    shape: serde_json::Value,
    validator: Option<jsonschema::Validator>,
}

impl Atomizer {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, options: AtomizeOptions) -> Self {
        let shape = target_shape();
        let validator = match jsonschema::validator_for(&shape) {
            Ok(validator) => Some(validator),
            Err(e) => {
                warn!(error = %e, "decomposition schema did not compile, skipping validation");
                None
            }
        };
        Self {
            generator,
            options,
            shape,
            validator,
        }
    }

    pub const fn set_preferences(&mut self, preferences: Preferences) {
        self.options.preferences = preferences;
    }

    #[must_use]
    pub const fn options(&self) -> &AtomizeOptions {
        &self.options
    }

    /// Decompose `task` into micro-tasks.
    pub async fn atomize(&self, task: &Task) -> AtomizeResult {
        let has_deadline = task.deadline.is_some();
        if task
            .estimated_minutes
            .is_some_and(|minutes| minutes <= SINGLE_STEP_LIMIT_MINUTES)
        {
            debug!(id = %task.id, "short task, keeping as a single step");
            return AtomizeResult::assemble(
                vec![single_step(task)],
                None,
                has_deadline,
                DecompositionSource::SingleTask,
            );
        }

        match self.generate(task).await {
            Some(repaired) => {
                debug!(id = %task.id, steps = repaired.steps.len(), "decomposed task");
                AtomizeResult::assemble(
                    repaired.steps,
                    repaired.mvp_suggestion,
                    has_deadline,
                    DecompositionSource::Model,
                )
            }
            None => AtomizeResult::assemble(
                vec![single_step(task)],
                None,
                has_deadline,
                DecompositionSource::Fallback,
            ),
        }
    }

    /// One model attempt. Every failure is logged and reported as `None`.
    async fn generate(&self, task: &Task) -> Option<repair::Repaired> {
        let prefs = &self.options.preferences;
        let messages = build_messages(task, prefs);
        let call = self.generator.generate_structured(&messages, &self.shape);

        let value = match tokio::time::timeout(self.options.timeout, call).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!(
                    provider = self.generator.name(),
                    error = %e,
                    "decomposition failed, using fallback"
                );
                return None;
            }
            Err(_) => {
                warn!(
                    provider = self.generator.name(),
                    timeout_secs = self.options.timeout.as_secs(),
                    "decomposition timed out, using fallback"
                );
                return None;
            }
        };

        if let Some(validator) = &self.validator {
            let errors: Vec<String> = validator
                .iter_errors(&value)
                .map(|e| e.to_string())
                .collect();
            if !errors.is_empty() {
                warn!(?errors, "decomposition does not match the requested shape, repairing");
            }
        }

        let repaired = repair(&value, prefs.max_steps());
        if repaired.is_none() {
            warn!(
                provider = self.generator.name(),
                "decomposition had no usable steps, using fallback"
            );
        }
        repaired
    }
}

/// The task itself as its only step.
fn single_step(task: &Task) -> MicroTask {
    MicroTask {
        title: enforce_verb(&task.title),
        description: task.description.clone(),
        estimated_minutes: clamp_minutes(task.estimated_minutes.unwrap_or(DEFAULT_STEP_MINUTES)),
        dependencies: Vec::new(),
        parallelizable: true,
    }
}
