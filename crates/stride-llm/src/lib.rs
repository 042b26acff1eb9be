//! # stride-llm
//!
//! Structured text generation for task decomposition.
//!
//! Exposes one capability, [`TextGenerator::generate_structured`]: prompt
//! messages plus a JSON Schema in, a JSON value out. Providers are Gemini and
//! Ollama; [`DisabledGenerator`] stands in when neither is configured.
//!
//! Failures are plain [`GenerationError`] values. Nothing here retries or
//! falls back; that belongs to the caller.

pub mod error;
pub mod gemini;
pub mod generator;
mod http;
pub mod json;
pub mod message;
pub mod ollama;

use std::sync::Arc;
use std::time::Duration;

use stride_config::{LlmConfig, LlmProvider};
use tracing::{debug, info};

pub use error::GenerationError;
pub use gemini::GeminiGenerator;
pub use generator::{DisabledGenerator, TextGenerator};
pub use message::{PromptMessage, Role};
pub use ollama::OllamaGenerator;

/// Build the generator selected by `config`.
///
/// An unconfigured provider (Gemini without a key, or `disabled`) yields a
/// [`DisabledGenerator`] rather than an error.
///
/// # Errors
///
/// Returns [`GenerationError::Http`] if the HTTP client cannot be built.
pub fn build_generator(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>, GenerationError> {
    if !config.is_configured() {
        debug!(provider = ?config.provider, "text generation not configured, using fallback only");
        return Ok(Arc::new(DisabledGenerator));
    }

    let timeout = Duration::from_secs(config.timeout_secs);
    let model = config.effective_model();
    let base_url = config.effective_base_url();
    let generator: Arc<dyn TextGenerator> = match config.provider {
        LlmProvider::Gemini => Arc::new(GeminiGenerator::new(
            base_url,
            model,
            &config.api_key,
            timeout,
        )?),
        LlmProvider::Ollama => Arc::new(OllamaGenerator::new(base_url, model, timeout)?),
        LlmProvider::Disabled => Arc::new(DisabledGenerator),
    };
    info!(provider = generator.name(), model, "text generator ready");
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gemini_without_key_is_disabled() {
        let config = LlmConfig {
            provider: LlmProvider::Gemini,
            ..LlmConfig::default()
        };
        assert_eq!(build_generator(&config).unwrap().name(), "disabled");
    }

    #[test]
    fn ollama_builds_without_key() {
        let config = LlmConfig {
            provider: LlmProvider::Ollama,
            ..LlmConfig::default()
        };
        assert_eq!(build_generator(&config).unwrap().name(), "ollama");
    }

    #[tokio::test]
    async fn disabled_generator_always_fails() {
        let err = DisabledGenerator
            .generate_structured(&[PromptMessage::user("x")], &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured { .. }));
    }
}
