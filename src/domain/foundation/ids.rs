//! Strongly-typed identifier value objects.
//!
//! Ticket ids are short random tokens (`TCK-` + 8 uppercase hex digits).
//! Message ids are derived from their owning ticket id plus a random suffix,
//! so the two can never collide.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Prefix shared by every generated ticket id.
pub const TICKET_ID_PREFIX: &str = "TCK-";

/// Marker between the owning ticket id and the random part of a message id.
const MESSAGE_ID_MARKER: &str = "-msg-";

/// Returns `len` lowercase hex characters from a fresh v4 UUID.
fn random_hex(len: usize) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..len].to_string()
}

/// Unique identifier for a support ticket.
///
/// Uniqueness is probabilistic (32 random bits); the store rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Generates a fresh ticket id like `TCK-3F9A12BC`.
    pub fn generate() -> Self {
        Self(format!("{}{}", TICKET_ID_PREFIX, random_hex(8).to_uppercase()))
    }

    /// Wraps an existing id (e.g. from a URL path or stored data).
    ///
    /// Ids written by older deployments are accepted as long as they are not blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("ticket_id"));
        }
        if trimmed.contains(MESSAGE_ID_MARKER) {
            return Err(ValidationError::invalid_format(
                "ticket_id",
                "looks like a message id",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TicketId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TicketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for one message in a ticket thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Generates a message id owned by `ticket_id`, e.g. `TCK-3F9A12BC-msg-0a1b2c3d`.
    pub fn for_ticket(ticket_id: &TicketId) -> Self {
        Self(format!("{}{}{}", ticket_id, MESSAGE_ID_MARKER, random_hex(8)))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
