//! HTTP adapter for tickets.
//!
//! # Endpoints
//!
//! - `POST /tickets` - Open a ticket and get the first answer
//! - `GET /tickets` - Ticket history
//! - `GET /tickets/{id}/thread` - Load a thread
//! - `POST /tickets/{id}/followup` - Post a follow-up message
//! - `POST /tickets/{id}/close` - Close a ticket

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{TicketApiError, TicketAppState};
pub use routes::ticket_router;
