//! Ticket collection shared by the store adapters.
//!
//! Holds ticket roots and messages in insertion order. The async adapters
//! wrap it in a lock so every port call is one atomic step.

use serde::{Deserialize, Serialize};

use super::similarity::rank_similar;
use crate::domain::foundation::{MessageId, TicketId, Timestamp};
use crate::domain::ticket::{MessageRole, SimilarIncident, Ticket, TicketMessage, TicketSummary};
use crate::ports::{StoreError, TicketRecord};

/// One persisted thread message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub ticket_id: TicketId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: Timestamp,
}

impl StoredMessage {
    fn to_message(&self) -> TicketMessage {
        TicketMessage::new(self.role, self.content.clone(), self.created_at)
    }
}

/// Every ticket root and message known to a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketCollection {
    #[serde(default)]
    tickets: Vec<Ticket>,
    #[serde(default)]
    messages: Vec<StoredMessage>,
}

impl TicketCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn find(&self, ticket_id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id() == ticket_id)
    }

    pub fn add_root(&mut self, ticket: &Ticket) -> Result<(), StoreError> {
        if self.find(ticket.id()).is_some() {
            return Err(StoreError::Conflict(format!(
                "ticket {} already exists",
                ticket.id()
            )));
        }
        self.tickets.push(ticket.clone());
        Ok(())
    }

    pub fn append(
        &mut self,
        ticket_id: &TicketId,
        role: MessageRole,
        content: &str,
        created_at: Timestamp,
    ) -> Result<MessageId, StoreError> {
        if self.find(ticket_id).is_none() {
            return Err(StoreError::NotFound(ticket_id.clone()));
        }

        let id = MessageId::for_ticket(ticket_id);
        self.messages.push(StoredMessage {
            id: id.clone(),
            ticket_id: ticket_id.clone(),
            role,
            content: content.to_string(),
            created_at,
        });
        Ok(id)
    }

    pub fn similar(&self, text: &str, k: usize) -> Vec<SimilarIncident> {
        rank_similar(text, &self.tickets, k)
    }

    /// Up to `limit` summaries, newest first; later insertions win ties.
    pub fn summaries(&self, limit: usize) -> Vec<TicketSummary> {
        let mut ordered: Vec<&Ticket> = self.tickets.iter().rev().collect();
        // Stable sort over the reversed list keeps later insertions first on ties.
        ordered.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        ordered
            .into_iter()
            .take(limit)
            .map(Ticket::summary)
            .collect()
    }

    /// The root and its messages sorted by timestamp, insertion order on ties.
    pub fn record(&self, ticket_id: &TicketId) -> TicketRecord {
        let Some(ticket) = self.find(ticket_id) else {
            return TicketRecord::missing();
        };

        let mut messages: Vec<&StoredMessage> = self
            .messages
            .iter()
            .filter(|m| &m.ticket_id == ticket_id)
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        TicketRecord::found(
            ticket.clone(),
            messages.into_iter().map(StoredMessage::to_message).collect(),
        )
    }

    /// Closes the ticket; closing a closed ticket changes nothing.
    pub fn close(&mut self, ticket_id: &TicketId) -> Result<(), StoreError> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| t.id() == ticket_id)
            .ok_or_else(|| StoreError::NotFound(ticket_id.clone()))?;
        ticket.close();
        Ok(())
    }
}
