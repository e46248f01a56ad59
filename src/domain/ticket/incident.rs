//! Similar past incidents surfaced by the document store.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::TicketId;

/// A past ticket that resembles the text being handled.
///
/// Produced fresh by every similarity query and never persisted.
/// Higher `similarity_score` means more relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarIncident {
    pub ticket_id: TicketId,
    pub subject: String,
    pub description: String,
    pub similarity_score: f64,
}

impl SimilarIncident {
    pub fn new(
        ticket_id: TicketId,
        subject: impl Into<String>,
        description: impl Into<String>,
        similarity_score: f64,
    ) -> Self {
        Self {
            ticket_id,
            subject: subject.into(),
            description: description.into(),
            similarity_score,
        }
    }

    /// First `max_chars` characters of the description.
    ///
    /// Cuts on character boundaries so multi-byte text never splits.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.description.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &self.description[..byte_idx],
            None => &self.description,
        }
    }
}
