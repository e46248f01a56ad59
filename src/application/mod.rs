//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    CloseTicketResult, CreateTicketCommand, PostFollowupCommand, TicketError, TicketOrchestrator,
    DEFAULT_HISTORY_LIMIT,
};
