//! Google Gemini `generateContent` client.

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

/// Client for the Gemini REST API.
pub struct GeminiGenerator {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiGenerator {
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        )
    }
}

/// Build the `generateContent` request body. System messages become the
/// system instruction; the schema rides along in it as text.
fn request_body(messages: &[PromptMessage], shape: &Value) -> Value {
    let mut system_parts: Vec<String> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.clone())
        .collect();
    system_parts.push(schema_instruction(shape));

    let contents: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| {
            let role = if m.role == Role::Assistant { "model" } else { "user" };
            json!({ "role": role, "parts": [{ "text": m.content }] })
        })
        .collect();

    json!({
        "systemInstruction": { "parts": [{ "text": system_parts.join("\n\n") }] },
        "contents": contents,
        "generationConfig": {
            "responseMimeType": "application/json",
            "temperature": 0.4,
        },
    })
}

/// Pull the first candidate's text out of a `generateContent` response and
/// parse it as JSON.
fn parse_response(body: &Value) -> Result<Value, GenerationError> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            let reason = body
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .unwrap_or("no candidate text");
            GenerationError::MalformedResponse(format!("gemini: {reason}"))
        })?;
    extract_json_payload(text)
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_structured(
        &self,
        messages: &[PromptMessage],
        shape: &Value,
    ) -> Result<Value, GenerationError> {
        debug!(model = %self.model, messages = messages.len(), "gemini generateContent");
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(messages, shape))
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let body: Value = resp.json().await?;
        parse_response(&body)
    }
}
