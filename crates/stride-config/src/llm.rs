//! Text-generation provider configuration.

use serde::{Deserialize, Serialize};

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

/// Which backend produces task decompositions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    /// No model; decomposition always uses the deterministic fallback.
    #[default]
    Disabled,
    /// Google Gemini `generateContent` API.
    Gemini,
    /// A local Ollama server.
    Ollama,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,

    /// Model name. Empty = the provider's default model.
    #[serde(default)]
    pub model: String,

    /// API key (Gemini only).
    #[serde(default)]
    pub api_key: String,

    /// Base URL override. Empty = the provider's public endpoint.
    #[serde(default)]
    pub base_url: String,

    /// Upper bound on a single generation request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Disabled,
            model: String::new(),
            api_key: String::new(),
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Check if the selected provider has the fields it needs.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.provider {
            LlmProvider::Disabled => false,
            LlmProvider::Gemini => !self.api_key.is_empty(),
            LlmProvider::Ollama => true,
        }
    }

    /// Model name, falling back to the provider default.
    #[must_use]
    pub fn effective_model(&self) -> &str {
        if !self.model.is_empty() {
            return &self.model;
        }
        match self.provider {
            LlmProvider::Gemini => "gemini-2.0-flash",
            LlmProvider::Ollama => "llama3.2",
            LlmProvider::Disabled => "",
        }
    }

    /// Base URL, falling back to the provider default.
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        if !self.base_url.is_empty() {
            return self.base_url.trim_end_matches('/');
        }
        match self.provider {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            LlmProvider::Ollama => "http://localhost:11434",
            LlmProvider::Disabled => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disabled_and_unconfigured() {
        let config = LlmConfig::default();
        assert_eq!(config.provider, LlmProvider::Disabled);
        assert!(!config.is_configured());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn gemini_requires_api_key() {
        let mut config = LlmConfig {
            provider: LlmProvider::Gemini,
            ..LlmConfig::default()
        };
        assert!(!config.is_configured());
        config.api_key = "key".to_string();
        assert!(config.is_configured());
        assert_eq!(config.effective_model(), "gemini-2.0-flash");
    }

    #[test]
    fn ollama_base_url_trims_trailing_slash() {
        let config = LlmConfig {
            provider: LlmProvider::Ollama,
            base_url: "http://gpu-box:11434/".to_string(),
            ..LlmConfig::default()
        };
        assert!(config.is_configured());
        assert_eq!(config.effective_base_url(), "http://gpu-box:11434");
    }
}
