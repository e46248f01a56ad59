//! Route configuration for ticket endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    close_ticket, create_ticket, get_thread, list_tickets, post_followup, TicketAppState,
};

/// Creates the ticket router with all endpoints.
///
/// Routes:
/// - `POST /tickets` - Open a ticket
/// - `GET /tickets?limit=` - Ticket history, newest first
/// - `GET /tickets/:id/thread` - Thread with regenerated guidance
/// - `POST /tickets/:id/followup` - Add a user message
/// - `POST /tickets/:id/close` - Close a ticket
///
/// The collection routes also answer with a trailing slash.
pub fn ticket_router() -> Router<TicketAppState> {
    Router::new()
        .route("/tickets", post(create_ticket).get(list_tickets))
        .route("/tickets/", post(create_ticket).get(list_tickets))
        .route("/tickets/:id/thread", get(get_thread))
        .route("/tickets/:id/followup", post(post_followup))
        .route("/tickets/:id/close", post(close_ticket))
}
