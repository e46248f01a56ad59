//! Model Backend Port - Interface for language-model invocation.
//!
//! The orchestrator hands an ordered list of role-tagged messages to a
//! backend and gets raw text back. Which provider answers is decided once
//! at startup; call sites only see this trait.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoBackend;
//!
//! #[async_trait]
//! impl ModelBackend for EchoBackend {
//!     async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
//!         Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for language-model completions.
///
/// Implementations own their transport and any timeout at that boundary.
/// No implementation retries on behalf of the caller.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Sends the conversation and returns the generated text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError>;

    /// Provider name and model identifier.
    fn provider_info(&self) -> ProviderInfo;
}

/// A message in the model conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Role of a model conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions that shape model behavior.
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// Uppercase label used by providers that take a flat transcript.
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::System => "SYSTEM",
            ChatRole::User => "USER",
            ChatRole::Assistant => "ASSISTANT",
        }
    }
}

/// Provider identification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "llama", "gemini").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Model backend errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Rate limited by provider.
    #[error("rate limited by model provider")]
    RateLimited,

    /// Provider is unavailable.
    #[error("model provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("model provider authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Provider replied with a body we could not read.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Backend is missing required settings.
    #[error("model backend not configured: {0}")]
    NotConfigured(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl ModelError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_work() {
        assert_eq!(ChatMessage::system("s").role, ChatRole::System);
        assert_eq!(ChatMessage::user("u").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("a").role, ChatRole::Assistant);
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn chat_role_labels_are_uppercase() {
        assert_eq!(ChatRole::User.label(), "USER");
        assert_eq!(ChatRole::System.label(), "SYSTEM");
    }

    #[test]
    fn model_error_displays_correctly() {
        assert_eq!(
            ModelError::Timeout { timeout_secs: 120 }.to_string(),
            "request timed out after 120s"
        );
        assert_eq!(
            ModelError::unavailable("503").to_string(),
            "model provider unavailable: 503"
        );
    }

    #[test]
    fn model_backend_is_object_safe() {
        fn _accepts(_backend: &dyn ModelBackend) {}
    }
}
