//! Ticket aggregate - one support request and its lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, TicketId, Timestamp, ValidationError};

/// How urgent a ticket is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(ValidationError::invalid_format(
                "severity",
                format!("unknown severity '{}'", other),
            )),
        }
    }
}

/// Lifecycle status of a ticket.
///
/// Valid transitions:
/// - Open -> Closed
///
/// Closed is terminal; tickets are never reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Open,
    Closed,
}

impl TicketStatus {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Closed => "closed",
        }
    }
}

impl StateMachine for TicketStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            TicketStatus::Open => vec![TicketStatus::Closed],
            TicketStatus::Closed => vec![],
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root record of a support ticket.
///
/// The description is fixed at creation. The only mutation is the
/// open -> closed status transition; messages live in their own records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    subject: String,
    description: String,
    #[serde(rename = "user_upn")]
    requester: String,
    severity: Severity,
    status: TicketStatus,
    created_at: Timestamp,
}

impl Ticket {
    /// Opens a new ticket.
    pub fn open(
        id: TicketId,
        subject: impl Into<String>,
        description: impl Into<String>,
        requester: impl Into<String>,
        severity: Severity,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            subject: subject.into(),
            description: description.into(),
            requester: requester.into(),
            severity,
            status: TicketStatus::Open,
            created_at,
        }
    }

    pub fn id(&self) -> &TicketId {
        &self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn requester(&self) -> &str {
        &self.requester
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn is_closed(&self) -> bool {
        self.status == TicketStatus::Closed
    }

    /// Closes the ticket.
    ///
    /// Returns `false` when the ticket was already closed (a no-op).
    pub fn close(&mut self) -> bool {
        match self.status.transition_to(TicketStatus::Closed) {
            Ok(next) => {
                self.status = next;
                true
            }
            Err(_) => false,
        }
    }

    /// Reduces the ticket to its history-list projection.
    pub fn summary(&self) -> TicketSummary {
        TicketSummary {
            ticket_id: self.id.clone(),
            subject: self.subject.clone(),
            severity: self.severity,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Lightweight ticket projection for the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub ticket_id: TicketId,
    pub subject: String,
    pub severity: Severity,
    pub status: TicketStatus,
    pub created_at: Timestamp,
}
