//! Decomposition prompt and the shape requested from the model.

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use stride_core::entities::{Preferences, Task};
use stride_core::enums::{StylePreset, Tone};
use stride_llm::PromptMessage;

/// What the model is asked to return.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DecompositionShape {
    /// Ordered steps that together finish the task.
    pub micro_tasks: Vec<StepShape>,
    /// The smallest step that makes real progress before the deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mvp_suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StepShape {
    /// Starts with an action verb, e.g. "Draft the executive summary".
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Between 15 and 60.
    pub estimated_minutes: u32,
    /// Zero-based positions of steps that must finish first.
    #[serde(default)]
    pub dependencies: Vec<usize>,
}

/// JSON Schema of [`DecompositionShape`].
#[must_use]
pub fn target_shape() -> serde_json::Value {
    serde_json::to_value(schema_for!(DecompositionShape)).unwrap_or_default()
}

#[must_use]
pub fn build_messages(task: &Task, prefs: &Preferences) -> Vec<PromptMessage> {
    let system = format!(
        "You break personal tasks into small, concrete next actions.\n\
         - Return at most {max} steps, in the order they should be done.\n\
         - Aim for about {target} minutes per step; never less than 15 or more than 60.\n\
         - Every title starts with an action verb.\n\
         - dependencies lists zero-based positions of earlier steps that block this one; \
         leave it empty when the step can start right away.\n\
         - {style}\n\
         - {tone}",
        max = prefs.max_steps(),
        target = prefs.step_size.target_minutes(),
        style = style_rule(prefs.style),
        tone = tone_rule(prefs.tone),
    );

    let mut user = format!("Task: {}", task.title);
    if let Some(description) = &task.description {
        user.push_str(&format!("\nDescription: {description}"));
    }
    if let Some(deadline) = task.deadline {
        user.push_str(&format!("\nDeadline: {}", deadline.to_rfc3339()));
    }
    if let Some(minutes) = task.estimated_minutes {
        user.push_str(&format!("\nEstimated time: {minutes} minutes"));
    }
    if let Some(goal) = &task.context.original_goal {
        user.push_str(&format!("\nOriginal goal: {goal}"));
    }
    if task.deadline.is_some() {
        user.push_str("\nAlso suggest an mvp_suggestion: the minimum progress worth making first.");
    }

    vec![PromptMessage::system(system), PromptMessage::user(user)]
}

const fn style_rule(style: StylePreset) -> &'static str {
    match style {
        StylePreset::Minimal => "Titles only; omit descriptions.",
        StylePreset::Balanced => "Add a one-line description where the title is not self-explanatory.",
        StylePreset::Detailed => "Give every step a description of one or two sentences.",
    }
}

const fn tone_rule(tone: Tone) -> &'static str {
    match tone {
        Tone::Encouraging => "Keep the wording warm and motivating.",
        Tone::Neutral => "Keep the wording plain.",
        Tone::Direct => "Keep the wording terse and imperative.",
    }
}
