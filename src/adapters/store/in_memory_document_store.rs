//! In-Memory Document Store Adapter
//!
//! Keeps tickets and messages in process memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::collection::TicketCollection;
use crate::domain::foundation::{MessageId, TicketId, Timestamp};
use crate::domain::ticket::{MessageRole, SimilarIncident, Ticket, TicketSummary};
use crate::ports::{DocumentStore, StoreError, TicketRecord};

/// In-memory document store
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    collection: Arc<RwLock<TicketCollection>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored ticket roots
    pub async fn ticket_count(&self) -> usize {
        self.collection.read().await.ticket_count()
    }

    /// Get the number of stored messages across all tickets
    pub async fn message_count(&self) -> usize {
        self.collection.read().await.message_count()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn add_ticket_root(&self, ticket: &Ticket) -> Result<(), StoreError> {
        self.collection.write().await.add_root(ticket)
    }

    async fn append_message(
        &self,
        ticket_id: &TicketId,
        role: MessageRole,
        content: &str,
        created_at: Timestamp,
    ) -> Result<MessageId, StoreError> {
        self.collection
            .write()
            .await
            .append(ticket_id, role, content, created_at)
    }

    async fn query_similar(
        &self,
        text: &str,
        k: usize,
    ) -> Result<Vec<SimilarIncident>, StoreError> {
        Ok(self.collection.read().await.similar(text, k))
    }

    async fn list_tickets(&self, limit: usize) -> Result<Vec<TicketSummary>, StoreError> {
        Ok(self.collection.read().await.summaries(limit))
    }

    async fn get_ticket_and_messages(
        &self,
        ticket_id: &TicketId,
    ) -> Result<TicketRecord, StoreError> {
        Ok(self.collection.read().await.record(ticket_id))
    }

    async fn close_ticket(&self, ticket_id: &TicketId) -> Result<(), StoreError> {
        self.collection.write().await.close(ticket_id)
    }
}
