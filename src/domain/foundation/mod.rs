//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the ticket domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{MessageId, TicketId, TICKET_ID_PREFIX};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
