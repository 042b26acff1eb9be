//! The text-generation capability.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::message::PromptMessage;

/// A backend that turns prompt messages into a JSON value shaped like `shape`.
///
/// `shape` is a JSON Schema. Implementations make exactly one attempt; callers
/// own retries and fallbacks.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns [`GenerationError`] for any transport, status, or parse failure.
    async fn generate_structured(
        &self,
        messages: &[PromptMessage],
        shape: &serde_json::Value,
    ) -> Result<serde_json::Value, GenerationError>;
}

/// Stand-in used when no provider is configured. Always fails, so decomposition
/// takes the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn generate_structured(
        &self,
        _messages: &[PromptMessage],
        _shape: &serde_json::Value,
    ) -> Result<serde_json::Value, GenerationError> {
        Err(GenerationError::NotConfigured {
            provider: self.name().to_string(),
        })
    }
}

/// Render the schema instruction appended to system prompts for providers
/// without native schema support.
#[must_use]
pub fn schema_instruction(shape: &serde_json::Value) -> String {
    format!(
        "Respond with a single JSON object and nothing else. It must conform to this JSON Schema:\n{shape}"
    )
}
