//! HTTP handlers for ticket endpoints.
//!
//! These handlers validate request bodies, call the ticket orchestrator
//! and map its errors to status codes.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::ticket::{
    CreateTicketCommand, PostFollowupCommand, TicketError, TicketOrchestrator,
};
use crate::domain::foundation::{ErrorCode, TicketId, ValidationError};
use crate::domain::ticket::{Severity, ThreadView, TicketSummary};

use super::dto::{
    CloseTicketResponse, CreateTicketRequest, ErrorResponse, FollowupRequest, HistoryQuery,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the ticket routes.
#[derive(Clone)]
pub struct TicketAppState {
    pub orchestrator: Arc<TicketOrchestrator>,
}

impl TicketAppState {
    pub fn new(orchestrator: Arc<TicketOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /tickets - Open a ticket and get the first answer
pub async fn create_ticket(
    State(state): State<TicketAppState>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<Json<ThreadView>, TicketApiError> {
    require_text("subject", &request.subject)?;
    require_text("description", &request.description)?;
    require_text("user_upn", &request.user_upn)?;

    let severity = match request.severity.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw.parse::<Severity>()?,
        _ => Severity::default(),
    };

    let cmd = CreateTicketCommand {
        subject: request.subject,
        description: request.description,
        requester: request.user_upn,
        severity,
    };

    let view = state.orchestrator.create_ticket(cmd).await?;
    Ok(Json(view))
}

/// POST /tickets/:id/followup - Add a user message and get the next answer
pub async fn post_followup(
    State(state): State<TicketAppState>,
    Path(ticket_id): Path<String>,
    Json(request): Json<FollowupRequest>,
) -> Result<Json<ThreadView>, TicketApiError> {
    let ticket_id = parse_ticket_id(&ticket_id)?;
    require_text("message", &request.message)?;

    let cmd = PostFollowupCommand {
        ticket_id,
        message: request.message,
    };

    let view = state.orchestrator.post_followup(cmd).await?;
    Ok(Json(view))
}

/// POST /tickets/:id/close - Mark a ticket closed
pub async fn close_ticket(
    State(state): State<TicketAppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<CloseTicketResponse>, TicketApiError> {
    let ticket_id = parse_ticket_id(&ticket_id)?;

    let result = state.orchestrator.close_ticket(&ticket_id).await?;

    Ok(Json(CloseTicketResponse {
        ticket_id: result.ticket_id,
        status: result.status,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /tickets - Latest tickets, newest first
pub async fn list_tickets(
    State(state): State<TicketAppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<TicketSummary>>, TicketApiError> {
    let summaries = state.orchestrator.list_history(query.limit).await?;
    Ok(Json(summaries))
}

/// GET /tickets/:id/thread - Thread with freshly generated guidance
pub async fn get_thread(
    State(state): State<TicketAppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<ThreadView>, TicketApiError> {
    let ticket_id = parse_ticket_id(&ticket_id)?;
    let view = state.orchestrator.load_thread(&ticket_id).await?;
    Ok(Json(view))
}

fn require_text(field: &str, value: &str) -> Result<(), TicketApiError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field).into());
    }
    Ok(())
}

/// A malformed id can never name a stored ticket, so it reads as missing.
fn parse_ticket_id(raw: &str) -> Result<TicketId, TicketApiError> {
    TicketId::new(raw).map_err(|_| TicketApiError::NotFound(raw.to_string()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum TicketApiError {
    BadRequest(String),
    NotFound(String),
    BadGateway { code: ErrorCode, message: String },
    Internal { code: ErrorCode, message: String },
}

impl From<ValidationError> for TicketApiError {
    fn from(err: ValidationError) -> Self {
        TicketApiError::BadRequest(err.to_string())
    }
}

impl From<TicketError> for TicketApiError {
    fn from(err: TicketError) -> Self {
        let code = err.code();
        match err {
            TicketError::NotFound(id) => TicketApiError::NotFound(id.to_string()),
            TicketError::Model(e) => TicketApiError::BadGateway {
                code,
                message: e.to_string(),
            },
            TicketError::Store(e) => TicketApiError::Internal {
                code,
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for TicketApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            TicketApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            TicketApiError::NotFound(id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found("Ticket", &id))
            }
            TicketApiError::BadGateway { code, message } => {
                (StatusCode::BAD_GATEWAY, ErrorResponse::new(code, message))
            }
            TicketApiError::Internal { code, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(code, message),
            ),
        };

        (status, Json(error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ModelError, StoreError};

    fn status_of(err: TicketApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn not_found_maps_to_404() {
        let id = TicketId::new("TCK-1").unwrap();
        assert_eq!(
            status_of(TicketError::NotFound(id).into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn model_failure_maps_to_502() {
        assert_eq!(
            status_of(TicketError::Model(ModelError::RateLimited).into()),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn store_failure_maps_to_500() {
        assert_eq!(
            status_of(TicketError::Store(StoreError::io("disk")).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_failures_carry_their_error_code() {
        let api_err: TicketApiError = TicketError::Store(StoreError::io("disk")).into();
        assert!(matches!(
            api_err,
            TicketApiError::Internal {
                code: ErrorCode::DocumentStoreError,
                ..
            }
        ));

        let api_err: TicketApiError = TicketError::Model(ModelError::RateLimited).into();
        assert!(matches!(
            api_err,
            TicketApiError::BadGateway {
                code: ErrorCode::ModelBackendError,
                ..
            }
        ));
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            status_of(ValidationError::empty_field("subject").into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text("message", "   ").is_err());
        assert!(require_text("message", "hi").is_ok());
    }

    #[test]
    fn malformed_ticket_id_reads_as_missing() {
        assert!(matches!(
            parse_ticket_id("TCK-1-msg-2"),
            Err(TicketApiError::NotFound(_))
        ));
    }
}
