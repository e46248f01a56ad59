//! OpenAI-compatible chat backend - Llama models served by Ollama or any
//! server exposing `/v1/chat/completions`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiCompatibleConfig::new("http://localhost:11434", "llama3.1:8b")
//!     .with_timeout(Duration::from_secs(120));
//!
//! let backend = OpenAiCompatibleBackend::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::transport::{check_status, decode_error, send_error};
use crate::ports::{ChatMessage, ChatRole, ModelBackend, ModelError, ProviderInfo};

/// Bearer token sent when no API key is configured.
const ANONYMOUS_BEARER: &str = "none";

/// Configuration for an OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Optional API key; local Ollama needs none.
    api_key: Option<Secret<String>>,
    /// Server root, without the `/v1` suffix.
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
}

impl OpenAiCompatibleConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: base_url.into(),
            model: model.into(),
            timeout: Duration::from_secs(120),
            temperature: 0.2,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn bearer_token(&self) -> &str {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .unwrap_or(ANONYMOUS_BEARER)
    }
}

/// Chat-completions backend for Llama-family models.
pub struct OpenAiCompatibleBackend {
    config: OpenAiCompatibleConfig,
    client: Client,
}

impl OpenAiCompatibleBackend {
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::not_configured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn to_request(&self, messages: &[ChatMessage]) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect(),
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl ModelBackend for OpenAiCompatibleBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let url = self.completions_url();
        tracing::debug!(url = %url, model = %self.config.model, "calling chat completions");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.bearer_token()),
            )
            .json(&self.to_request(messages))
            .send()
            .await
            .map_err(|e| send_error(e, self.config.timeout))?;

        let body: ChatResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        extract_content(body)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("llama", &self.config.model)
    }
}

fn extract_content(body: ChatResponse) -> Result<String, ModelError> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| ModelError::parse("No choices in response"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: ChatRole,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
