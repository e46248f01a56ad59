//! Thread view returned to the boundary layer.

use serde::{Deserialize, Serialize};

use super::{
    FollowupQuestion, MessageRole, Severity, SimilarIncident, StructuredReply, SuggestedAction,
    Ticket, TicketMessage, TicketStatus,
};
use crate::domain::foundation::TicketId;

/// Everything the UI needs to render one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadView {
    pub ticket_id: TicketId,
    pub subject: String,
    pub description: String,
    pub user_upn: String,
    pub severity: Severity,
    pub status: TicketStatus,
    pub answer: String,
    pub suggested_actions: Vec<SuggestedAction>,
    pub followup_questions: Vec<FollowupQuestion>,
    pub thread: Vec<TicketMessage>,
    pub similar_incidents: Vec<SimilarIncident>,
}

impl ThreadView {
    pub fn assemble(
        ticket: &Ticket,
        reply: StructuredReply,
        thread: Vec<TicketMessage>,
        similar_incidents: Vec<SimilarIncident>,
    ) -> Self {
        Self {
            ticket_id: ticket.id().clone(),
            subject: ticket.subject().to_string(),
            description: ticket.description().to_string(),
            user_upn: ticket.requester().to_string(),
            severity: ticket.severity(),
            status: ticket.status(),
            answer: reply.answer,
            suggested_actions: reply.suggested_actions,
            followup_questions: reply.followup_questions,
            thread,
            similar_incidents,
        }
    }

    /// Number of messages written by `role`.
    pub fn count_by_role(&self, role: MessageRole) -> usize {
        self.thread.iter().filter(|m| m.role == role).count()
    }
}
