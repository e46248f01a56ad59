//! Request and response shapes for the ticket endpoints.
//!
//! Thread views and summaries are returned as their domain types; only
//! the request bodies and small confirmations live here.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ErrorCode, TicketId};
use crate::domain::ticket::TicketStatus;

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /tickets`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub description: String,
    /// Requester identity (user principal name).
    pub user_upn: String,
    /// One of low, medium, high, critical. Defaults to medium.
    #[serde(default)]
    pub severity: Option<String>,
}

/// Body of `POST /tickets/:id/followup`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowupRequest {
    pub message: String,
}

/// Query string of `GET /tickets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Confirmation of `POST /tickets/:id/close`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseTicketResponse {
    pub ticket_id: TicketId,
    pub status: TicketStatus,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        Self::new(
            ErrorCode::TicketNotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }
}
