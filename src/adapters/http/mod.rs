//! HTTP adapters - REST API implementations.
//!
//! Each area has its own routes; `app_router` puts them behind the
//! tracing, CORS and timeout layers.

pub mod health;
pub mod router;
pub mod tickets;

pub use health::{health_router, HealthAppState};
pub use router::{app_router, AppState, RouterOptions};
pub use tickets::{ticket_router, TicketApiError, TicketAppState};
