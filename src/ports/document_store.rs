//! Document store port.
//!
//! Durable backing for ticket roots and their messages, plus similarity
//! search over ticket descriptions.
//!
//! # Design
//!
//! - **Per-operation atomicity**: each call is atomic on its own; there are
//!   no cross-call transactions
//! - **Append-only messages**: no edit or delete operations exist
//! - **Ticket-scoped similarity**: only ticket roots are candidates

use async_trait::async_trait;

use crate::domain::foundation::{MessageId, TicketId, Timestamp};
use crate::domain::ticket::{MessageRole, SimilarIncident, Ticket, TicketMessage, TicketSummary};

/// Repository port for tickets and their threads.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new ticket root.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a root with the same id already exists
    async fn add_ticket_root(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Append one message to a ticket's thread.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the ticket doesn't exist
    async fn append_message(
        &self,
        ticket_id: &TicketId,
        role: MessageRole,
        content: &str,
        created_at: Timestamp,
    ) -> Result<MessageId, StoreError>;

    /// Up to `k` tickets whose descriptions resemble `text`, best first.
    async fn query_similar(&self, text: &str, k: usize) -> Result<Vec<SimilarIncident>, StoreError>;

    /// Up to `limit` ticket summaries, newest first.
    async fn list_tickets(&self, limit: usize) -> Result<Vec<TicketSummary>, StoreError>;

    /// The ticket root (if any) and its messages in timestamp order.
    async fn get_ticket_and_messages(&self, ticket_id: &TicketId)
        -> Result<TicketRecord, StoreError>;

    /// Mark a ticket closed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the ticket doesn't exist
    async fn close_ticket(&self, ticket_id: &TicketId) -> Result<(), StoreError>;
}

/// A ticket root together with its thread.
///
/// `ticket` is `None` when no root exists for the requested id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketRecord {
    pub ticket: Option<Ticket>,
    pub messages: Vec<TicketMessage>,
}

impl TicketRecord {
    pub fn found(ticket: Ticket, messages: Vec<TicketMessage>) -> Self {
        Self {
            ticket: Some(ticket),
            messages,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

/// Document store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(err: serde_yaml::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
