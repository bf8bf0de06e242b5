//! Hosted chat completion API client.
//!
//! One `call` operation against Google, Anthropic, or OpenAI, selected by
//! model name prefix. Requests are plain text in, plain text out; the
//! caller owns any post-processing.

use crate::config::Config;
use crate::types::{ChatError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Completion API provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    Anthropic,
    OpenAi,
}

impl LlmProvider {
    /// Detect provider from a model name.
    pub fn from_model(model: &str) -> Self {
        if model.starts_with("gemini") || model.starts_with("models/gemini") {
            LlmProvider::Gemini
        } else if model.starts_with("claude") || model.starts_with("anthropic") {
            LlmProvider::Anthropic
        } else {
            LlmProvider::OpenAi
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: String,
}

/// Chat completion client.
pub struct LlmClient {
    api_key: String,
    model: String,
    provider: LlmProvider,
    client: Client,
}

impl LlmClient {
    /// Create a client for a model name; the provider is detected from the
    /// prefix.
    pub fn new(model: String, api_key: String) -> Self {
        let provider = LlmProvider::from_model(&model);
        Self {
            api_key,
            model,
            provider,
            client: Client::new(),
        }
    }

    /// Create from environment variables.
    ///
    /// Uses `PGCHAT_LLM` for the model (default: "gemini-2.5-flash") and
    /// the provider's key variable for authentication.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Config` if the key variable is not set.
    pub fn from_env() -> Result<Self> {
        let model =
            std::env::var("PGCHAT_LLM").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let api_key = Config::api_key_for_model(&model)?;
        Ok(Self::new(model, api_key))
    }

    /// Model name this client sends.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Detected provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Send a system + user prompt pair and return the completion text.
    ///
    /// Temperature is pinned to 0 for reproducible SQL. No timeout and no
    /// retry: a hanging or failing call surfaces directly.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Llm` for transport errors, non-success statuses,
    /// and malformed response bodies.
    pub async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        debug!(model = %self.model, provider = ?self.provider, "LLM request");
        match self.provider {
            LlmProvider::Gemini => self.call_gemini(system_prompt, user_prompt).await,
            LlmProvider::Anthropic => self.call_anthropic(system_prompt, user_prompt).await,
            LlmProvider::OpenAi => self.call_openai(system_prompt, user_prompt).await,
        }
    }

    async fn call_gemini(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let model = self.model.strip_prefix("models/").unwrap_or(&self.model);
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            model
        );

        let body = self
            .post_json(
                self.client.post(url).header("x-goog-api-key", &self.api_key),
                &json!({
                    "system_instruction": {"parts": [{"text": system_prompt}]},
                    "contents": [{"role": "user", "parts": [{"text": user_prompt}]}],
                    "generationConfig": {"temperature": 0.0}
                }),
                "Gemini",
            )
            .await?;

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Llm(format!("failed to parse Gemini response: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ChatError::Llm("no candidates from Gemini".to_string()))
    }

    async fn call_anthropic(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let body = self
            .post_json(
                self.client
                    .post("https://api.anthropic.com/v1/messages")
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", "2023-06-01"),
                &json!({
                    "model": self.model,
                    "max_tokens": 1024,
                    "system": system_prompt,
                    "messages": [{"role": "user", "content": user_prompt}],
                    "temperature": 0.0
                }),
                "Anthropic",
            )
            .await?;

        let parsed: AnthropicResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Llm(format!("failed to parse Anthropic response: {}", e)))?;

        parsed
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| ChatError::Llm("no content from Anthropic".to_string()))
    }

    async fn call_openai(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let body = self
            .post_json(
                self.client
                    .post("https://api.openai.com/v1/chat/completions")
                    .header("Authorization", format!("Bearer {}", self.api_key)),
                &json!({
                    "model": self.model,
                    "messages": [
                        {"role": "system", "content": system_prompt},
                        {"role": "user", "content": user_prompt}
                    ],
                    "temperature": 0.0
                }),
                "OpenAI",
            )
            .await?;

        let parsed: OpenAiResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Llm(format!("failed to parse OpenAI response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ChatError::Llm("no choices from OpenAI".to_string()))
    }

    /// POST a JSON body and return the response text, surfacing non-success
    /// statuses with the raw body.
    async fn post_json(
        &self,
        request: reqwest::RequestBuilder,
        body: &serde_json::Value,
        provider: &str,
    ) -> Result<String> {
        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| ChatError::Llm(format!("{} API request failed: {}", provider, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::Llm(format!("failed to read {} response: {}", provider, e)))?;

        if !status.is_success() {
            return Err(ChatError::Llm(format!(
                "{} API error {}: {}",
                provider, status, text
            )));
        }

        Ok(text)
    }
}
