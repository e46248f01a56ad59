//! Ticket handlers.
//!
//! The orchestrator owns the ticket lifecycle: create, list, load,
//! follow up and close.

mod errors;
mod orchestrator;

pub use errors::TicketError;
pub use orchestrator::{
    CloseTicketResult, CreateTicketCommand, PostFollowupCommand, TicketOrchestrator,
    DEFAULT_HISTORY_LIMIT,
};
