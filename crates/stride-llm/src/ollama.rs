//! Local Ollama `/api/chat` client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::GenerationError;
use crate::generator::{TextGenerator, schema_instruction};
use crate::http::check_response;
use crate::json::extract_json_payload;
use crate::message::{PromptMessage, Role};

const USER_AGENT: &str = concat!("stride/", env!("CARGO_PKG_VERSION"));

/// Client for an Ollama server. Ollama accepts a JSON Schema in `format`
/// and constrains decoding to it.
pub struct OllamaGenerator {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

fn request_body(model: &str, messages: &[PromptMessage], shape: &Value) -> Value {
    let mut wire: Vec<Value> = messages
        .iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect();
    if !messages.iter().any(|m| m.role == Role::System) {
        wire.insert(0, json!({ "role": "system", "content": schema_instruction(shape) }));
    }
    json!({
        "model": model,
        "messages": wire,
        "stream": false,
        "format": shape,
    })
}

fn parse_response(body: &Value) -> Result<Value, GenerationError> {
    let text = body
        .pointer("/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| GenerationError::MalformedResponse("ollama: missing message.content".into()))?;
    extract_json_payload(text)
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate_structured(
        &self,
        messages: &[PromptMessage],
        shape: &Value,
    ) -> Result<Value, GenerationError> {
        debug!(model = %self.model, messages = messages.len(), "ollama chat");
        let resp = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request_body(&self.model, messages, shape))
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let body: Value = resp.json().await?;
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_body_sets_format_and_disables_streaming() {
        let shape = json!({"type": "object", "required": ["micro_tasks"]});
        let body = request_body(
            "llama3.2",
            &[PromptMessage::system("Break it down."), PromptMessage::user("Plan offsite")],
            &shape,
        );
        assert_eq!(body["stream"], false);
        assert_eq!(body["format"], shape);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Plan offsite");
    }

    #[test]
    fn request_body_adds_schema_instruction_without_system_message() {
        let body = request_body("llama3.2", &[PromptMessage::user("x")], &json!({}));
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
    }

    #[test]
    fn parse_response_reads_message_content() {
        let body = json!({
            "model": "llama3.2",
            "message": { "role": "assistant", "content": "{\"mvp_suggestion\":\"Send draft\"}" },
            "done": true
        });
        assert_eq!(parse_response(&body).unwrap()["mvp_suggestion"], "Send draft");
    }

    #[test]
    fn parse_response_without_message_is_malformed() {
        let err = parse_response(&json!({"done": true})).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }
}
