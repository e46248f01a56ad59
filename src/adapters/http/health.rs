//! Liveness and model smoke-test endpoints.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::foundation::ErrorCode;
use crate::ports::{ChatMessage, ModelBackend};

use super::tickets::dto::ErrorResponse;

pub const ROOT_MESSAGE: &str = "Enterprise Ticket Agent backend is running";

const SMOKE_TEST_SYSTEM: &str = "You are a helpful assistant.";
const SMOKE_TEST_PROMPT: &str = "Say one short sentence about Mac M2.";

/// Shared state for the health routes.
#[derive(Clone)]
pub struct HealthAppState {
    pub model: Arc<dyn ModelBackend>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestLlmResponse {
    pub answer: String,
}

/// GET / - Service banner
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// GET /test-llm - One round trip through the configured model backend
pub async fn test_llm(State(state): State<HealthAppState>) -> axum::response::Response {
    let messages = [
        ChatMessage::system(SMOKE_TEST_SYSTEM),
        ChatMessage::user(SMOKE_TEST_PROMPT),
    ];
    let provider = state.model.provider_info();

    match state.model.complete(&messages).await {
        Ok(answer) => {
            info!(provider = %provider.name, model = %provider.model, "Model smoke test passed");
            Json(TestLlmResponse { answer }).into_response()
        }
        Err(e) => {
            error!(provider = %provider.name, error = %e, "Model smoke test failed");
            let body = ErrorResponse::new(ErrorCode::ModelBackendError, e.to_string());
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}

pub fn health_router() -> Router<HealthAppState> {
    Router::new()
        .route("/", get(root))
        .route("/test-llm", get(test_llm))
}
