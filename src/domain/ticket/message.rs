//! Thread messages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Who wrote a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The person who raised the ticket.
    User,
    /// The AI assistant.
    Agent,
}

impl MessageRole {
    /// Prefix used when the message is rendered into a prompt transcript.
    pub fn transcript_prefix(&self) -> &'static str {
        match self {
            MessageRole::User => "USER",
            MessageRole::Agent => "AGENT",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => f.write_str("user"),
            MessageRole::Agent => f.write_str("agent"),
        }
    }
}

/// One immutable turn in a ticket thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(rename = "timestamp")]
    pub created_at: Timestamp,
}

impl TicketMessage {
    pub fn new(role: MessageRole, content: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            role,
            content: content.into(),
            created_at,
        }
    }

    pub fn user(content: impl Into<String>, created_at: Timestamp) -> Self {
        Self::new(MessageRole::User, content, created_at)
    }

    pub fn agent(content: impl Into<String>, created_at: Timestamp) -> Self {
        Self::new(MessageRole::Agent, content, created_at)
    }

    /// `ROLE: content` line for prompt transcripts.
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.role.transcript_prefix(), self.content)
    }
}
