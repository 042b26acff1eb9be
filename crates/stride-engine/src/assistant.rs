//! The user-facing facade.
//!
//! [`Assistant`] owns the ledger, the preferences, and one value of each
//! engine, and exposes the operations a user actually performs. Capture runs
//! the date parser and the priority engine before the task is written; every
//! mutation that a plan cares about is followed by the matching adaptation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use stride_config::StrideConfig;
use stride_core::clock::{Clock, SystemClock};
use stride_core::entities::{Notification, Preferences, Task};
use stride_core::enums::Priority;
use stride_llm::{DisabledGenerator, TextGenerator, build_generator};
use stride_store::{
    CreateTaskInput, JsonlRecordStore, LedgerExport, MutationIntent, PreferencesStore, TaskFilter,
    TaskPatch, TaskStore,
};
use tracing::{info, warn};

use crate::atomize::{AtomizeOptions, AtomizeResult, Atomizer};
use crate::dates::{NaturalDateParser, ParsedDate};
use crate::error::EngineError;
use crate::notify::NotificationPlanner;
use crate::plan::{AdaptTrigger, DayPlan, PlanAdaptation, PlanManager};
use crate::priority::{Classification, PriorityEngine, PrioritySignals, get_next_task};

/// File name of the task ledger inside the data directory.
pub const LEDGER_FILE: &str = "tasks.jsonl";
/// File name of the preferences record inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// A mutation together with the plan's reaction to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub task: Task,
    pub adaptation: PlanAdaptation,
}

/// A decomposition and the child tasks it produced, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atomized {
    pub task_id: String,
    pub result: AtomizeResult,
    /// Children written to the ledger, in execution order. Empty when the
    /// task stays a single step.
    pub children: Vec<Task>,
}

pub struct Assistant {
    store: TaskStore,
    preferences_store: PreferencesStore,
    preferences: Preferences,
    parser: NaturalDateParser,
    engine: PriorityEngine,
    atomizer: Atomizer,
    plans: PlanManager,
    reminder_lead_hours: u32,
}

impl Assistant {
    /// Assemble an assistant from parts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the stored preferences cannot be read.
    pub fn new(
        store: TaskStore,
        preferences_store: PreferencesStore,
        generator: Arc<dyn TextGenerator>,
        config: &StrideConfig,
    ) -> Result<Self, EngineError> {
        let preferences = preferences_store.load()?;
        let engine = PriorityEngine::default();
        let options = AtomizeOptions {
            preferences,
            timeout: Duration::from_secs(config.llm.timeout_secs),
        };
        Ok(Self {
            store,
            preferences_store,
            preferences,
            parser: NaturalDateParser::new(),
            engine,
            atomizer: Atomizer::new(generator, options),
            plans: PlanManager::new(engine)
                .with_today_limit(config.general.today_limit)
                .with_tone(preferences.tone),
            reminder_lead_hours: config.schedule.reminder_lead_hours,
        })
    }

    /// Open the ledger and preferences under the configured data directory,
    /// with the wall clock and the configured text generator.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the ledger or preferences cannot be read.
    pub fn open(config: &StrideConfig) -> Result<Self, EngineError> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`Assistant::open`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the ledger or preferences cannot be read.
    pub fn open_with_clock(
        config: &StrideConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EngineError> {
        let data_dir = config.general.resolved_data_dir();
        let backend = JsonlRecordStore::new(data_dir.join(LEDGER_FILE));
        let store = TaskStore::open(Box::new(backend), clock)?
            .with_defer_hour(config.schedule.defer_hour);
        let preferences = PreferencesStore::file(data_dir.join(PREFERENCES_FILE));
        let generator: Arc<dyn TextGenerator> = match build_generator(&config.llm) {
            Ok(generator) => generator,
            Err(e) => {
                warn!(error = %e, "text generator unavailable, decomposition will use fallbacks");
                Arc::new(DisabledGenerator)
            }
        };
        Self::new(store, preferences, generator, config)
    }

    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    fn now(&self) -> DateTime<Utc> {
        self.store.clock().now()
    }

    // -- capture and queries ------------------------------------------------

    /// Create a task from user input.
    ///
    /// A missing deadline is looked for in the raw text, a missing title is
    /// derived from it, and a missing priority is classified.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] for an unknown parent or a persistence failure.
    pub fn capture(&mut self, mut input: CreateTaskInput) -> Result<Outcome, EngineError> {
        let now = self.now();
        if input.deadline.is_none() {
            input.deadline = self
                .parser
                .extract_deadline(&input.raw_input, now)
                .map(|found| found.date.instant);
        }
        if input.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            input.title = Some(self.parser.derive_title(&input.raw_input, now));
        }
        if input.priority.is_none() {
            let signals = PrioritySignals::from_input(&input, now);
            let classification = self.engine.classify(&signals, now);
            input.priority = Some(classification.level);
            input.priority_reason = Some(classification.reason);
        }

        let task = self.store.create(input)?;
        info!(id = %task.id, priority = %task.priority, "captured task");
        let adaptation = self.adapt(&AdaptTrigger::NewTask {
            task_id: task.id.clone(),
        })?;
        Ok(Outcome { task, adaptation })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.store.get(id)
    }

    #[must_use]
    pub fn list(&self, filter: &TaskFilter) -> Vec<Task> {
        self.store.get_all(filter)
    }

    /// Score a stored task without changing it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] for an unknown id.
    pub fn classify(&self, id: &str) -> Result<Classification, EngineError> {
        let task = self.store.require(id)?;
        Ok(self.engine.classify_task(task, self.now()))
    }

    #[must_use]
    pub fn parse_date(&self, text: &str) -> Option<ParsedDate> {
        self.parser.parse(text, self.now())
    }

    #[must_use]
    pub fn next_task(&self) -> Option<Task> {
        get_next_task(&self.store.get_all(&TaskFilter::new()))
    }

    // -- mutations ----------------------------------------------------------

    /// Apply an explicit edit. A deadline that differs from the stored one
    /// re-runs classification; restating the same deadline does not.
    ///
    /// # Errors
    ///
    /// Returns [`stride_store::StoreError::ExplicitRequired`] (wrapped) for an implicit request.
    pub fn update(
        &mut self,
        id: &str,
        patch: TaskPatch,
        intent: MutationIntent,
    ) -> Result<Outcome, EngineError> {
        let deadline_changed = patch
            .deadline
            .is_some_and(|deadline| self.store.get(id).is_some_and(|t| t.deadline != deadline));
        let task = self.store.update(id, patch, intent)?;
        let adaptation = if deadline_changed {
            self.adapt(&AdaptTrigger::DeadlineChanged {
                task_id: task.id.clone(),
            })?
        } else {
            PlanAdaptation::unchanged()
        };
        let task = self.store.require(id)?.clone();
        Ok(Outcome { task, adaptation })
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Store`] for an unknown id or a disallowed transition.
    pub fn complete(&mut self, id: &str) -> Result<Outcome, EngineError> {
        let task = self.store.complete(id)?;
        let adaptation = self.adapt(&AdaptTrigger::TaskCompleted {
            task_id: task.id.clone(),
        })?;
        Ok(Outcome { task, adaptation })
    }

    /// Defer to `until`, or to tomorrow at the configured hour.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] for an unknown id or a disallowed transition.
    pub fn defer(
        &mut self,
        id: &str,
        until: Option<DateTime<Utc>>,
    ) -> Result<Outcome, EngineError> {
        let task = self.store.defer(id, until)?;
        let adaptation = self.adapt(&AdaptTrigger::TaskDeferred {
            task_id: task.id.clone(),
        })?;
        Ok(Outcome { task, adaptation })
    }

    /// # Errors
    ///
    /// Returns [`stride_store::StoreError::ExplicitRequired`] (wrapped) for an implicit request.
    pub fn delete(&mut self, id: &str, intent: MutationIntent) -> Result<Task, EngineError> {
        Ok(self.store.delete(id, intent)?)
    }

    /// Manual priority override.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] for an unknown id.
    pub fn set_priority(&mut self, id: &str, priority: Priority) -> Result<Task, EngineError> {
        Ok(self.store.override_priority(id, priority)?)
    }

    /// Decompose a task. Micro-tasks are written as children only once the
    /// whole decomposition is in hand, and only when it came from the model.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] for an unknown id or a persistence failure.
    /// Generation failures are not errors.
    pub async fn atomize_task(&mut self, id: &str) -> Result<Atomized, EngineError> {
        let task = self.store.require(id)?.clone();
        let result = self.atomizer.atomize(&task).await;
        if result.is_single_step() {
            return Ok(Atomized {
                task_id: task.id,
                result,
                children: Vec::new(),
            });
        }

        let mut created: HashMap<usize, String> = HashMap::new();
        let mut children = Vec::with_capacity(result.micro_tasks.len());
        for index in result.execution_order() {
            let step = &result.micro_tasks[index];
            let mut input = CreateTaskInput::new(step.title.clone())
                .title(step.title.clone())
                .parent(task.id.clone())
                .estimate(step.estimated_minutes)
                .priority(task.priority, format!("Step of \"{}\"", task.title));
            if let Some(description) = &step.description {
                input = input.description(description.clone());
            }
            for dependency in &step.dependencies {
                if let Some(dep_id) = created.get(dependency) {
                    input = input.related(dep_id.clone());
                }
            }
            let child = self.store.create(input)?;
            created.insert(index, child.id.clone());
            children.push(child);
        }
        info!(id = %task.id, children = children.len(), "atomized task");
        Ok(Atomized {
            task_id: task.id,
            result,
            children,
        })
    }

    // -- plans --------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the trigger names an unknown task or a write fails.
    pub fn adapt(&mut self, trigger: &AdaptTrigger) -> Result<PlanAdaptation, EngineError> {
        Ok(self.plans.adapt_plan(&mut self.store, trigger)?)
    }

    #[must_use]
    pub fn today_plan(&self) -> DayPlan {
        self.plans.today_plan(&self.store)
    }

    #[must_use]
    pub fn today_tasks(&self) -> Vec<Task> {
        self.plans.today_tasks(&self.store)
    }

    #[must_use]
    pub fn week_plan(&self) -> Vec<DayPlan> {
        self.plans.week_plan(&self.store)
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.plans.current_streak(&self.store)
    }

    /// Move every stale scheduled task onto today.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if a write fails.
    pub fn sweep(&mut self) -> Result<PlanAdaptation, EngineError> {
        self.adapt(&AdaptTrigger::TimePassed)
    }

    /// Reminders derived from the current ledger.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        let planner = NotificationPlanner::new(
            self.reminder_lead_hours,
            self.preferences.notification_frequency,
        );
        let tasks = self.store.get_all(&TaskFilter::new());
        planner.plan(&tasks, self.now())
    }

    // -- ledger transfer and preferences ------------------------------------

    #[must_use]
    pub fn export(&self) -> LedgerExport {
        self.store.export()
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Store`] for an unsupported export version or a write failure.
    pub fn import(&mut self, export: LedgerExport) -> Result<Vec<Task>, EngineError> {
        Ok(self.store.import(export)?)
    }

    #[must_use]
    pub const fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Replace preferences wholesale and apply them to the engines.
    ///
    /// # Errors
    ///
    /// Returns a validation or persistence error; nothing changes on failure.
    pub fn set_preferences(
        &mut self,
        preferences: Preferences,
    ) -> Result<Preferences, EngineError> {
        let stored = self.preferences_store.replace(preferences)?;
        self.preferences = stored;
        self.atomizer.set_preferences(stored);
        self.plans = self.plans.with_tone(stored.tone);
        Ok(stored)
    }
}
