//! Gemini backend - Google Generative Language REST API.
//!
//! Gemini receives the conversation flattened into one text part of
//! `ROLE: content` lines. The API key travels in the `key` query parameter.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::transport::{check_status, decode_error, send_error};
use crate::ports::{ChatMessage, ModelBackend, ModelError, ProviderInfo};

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini `generateContent` backend.
pub struct GeminiBackend {
    config: GeminiConfig,
    client: Client,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Result<Self, ModelError> {
        if config.api_key().trim().is_empty() {
            return Err(ModelError::not_configured("Gemini API key is empty"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::not_configured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

/// Flattens a conversation into `ROLE: content` lines.
pub fn flatten_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let url = self.generate_url();
        tracing::debug!(url = %url, model = %self.config.model, "calling gemini generateContent");

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: flatten_transcript(messages),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key())])
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(e, self.config.timeout))?;

        let body: GenerateResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        extract_text(body)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

fn extract_text(body: GenerateResponse) -> Result<String, ModelError> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::parse("No candidates in response"))?;

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    Ok(text.trim().to_string())
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}
