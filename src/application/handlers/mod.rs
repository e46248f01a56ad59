//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod ticket;

pub use ticket::{
    CloseTicketResult, CreateTicketCommand, PostFollowupCommand, TicketError, TicketOrchestrator,
    DEFAULT_HISTORY_LIMIT,
};
