//! Top-level router: ticket and health routes behind the shared layers.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::application::handlers::ticket::TicketOrchestrator;
use crate::config::ServerConfig;
use crate::ports::ModelBackend;

use super::health::{health_router, HealthAppState};
use super::tickets::{ticket_router, TicketAppState};

/// Dependencies shared by every route.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TicketOrchestrator>,
    pub model: Arc<dyn ModelBackend>,
}

impl AppState {
    pub fn new(orchestrator: Arc<TicketOrchestrator>, model: Arc<dyn ModelBackend>) -> Self {
        Self {
            orchestrator,
            model,
        }
    }
}

/// Options for the cross-cutting layers.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Allowed CORS origins. Empty means no cross-origin access.
    pub cors_origins: Vec<String>,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl RouterOptions {
    pub fn from_server_config(config: &ServerConfig) -> Self {
        Self {
            cors_origins: config.cors_origins_list(),
            request_timeout: Some(config.request_timeout()),
        }
    }
}

/// Builds the full application router.
pub fn app_router(state: AppState, options: &RouterOptions) -> Router {
    let tickets = ticket_router().with_state(TicketAppState::new(state.orchestrator.clone()));
    let health = health_router().with_state(HealthAppState {
        model: state.model.clone(),
    });

    let mut app = Router::new()
        .merge(health)
        .merge(tickets)
        .layer(cors_layer(&options.cors_origins));

    if let Some(timeout) = options.request_timeout {
        app = app.layer(TimeoutLayer::new(timeout));
    }

    app.layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    info!(origins = allowed.len(), "CORS configured");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}
