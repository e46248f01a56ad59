//! Errors surfaced by ticket operations.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, TicketId};
use crate::ports::{ModelError, StoreError};

/// Failure of a single ticket operation.
///
/// `NotFound` is kept apart from upstream failures so the boundary layer
/// can map it to a missing-resource response. Malformed model output never
/// appears here; the parser absorbs it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TicketError {
    #[error("Ticket not found: {0}")]
    NotFound(TicketId),

    #[error("Model backend error: {0}")]
    Model(#[from] ModelError),

    #[error("Document store error: {0}")]
    Store(StoreError),
}

impl TicketError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TicketError::NotFound(_))
    }

    /// Error code reported to clients.
    pub fn code(&self) -> ErrorCode {
        match self {
            TicketError::NotFound(_) => ErrorCode::TicketNotFound,
            TicketError::Model(_) => ErrorCode::ModelBackendError,
            TicketError::Store(_) => ErrorCode::DocumentStoreError,
        }
    }
}

impl From<StoreError> for TicketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => TicketError::NotFound(id),
            other => TicketError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> TicketId {
        TicketId::new("TCK-0000BEEF").unwrap()
    }

    #[test]
    fn store_not_found_becomes_ticket_not_found() {
        let err: TicketError = StoreError::NotFound(id()).into();
        assert_eq!(err, TicketError::NotFound(id()));
        assert!(err.is_not_found());
    }

    #[test]
    fn other_store_errors_stay_upstream() {
        let err: TicketError = StoreError::io("disk full").into();
        assert!(matches!(err, TicketError::Store(StoreError::Io(_))));
        assert!(!err.is_not_found());
        assert_eq!(err.code(), ErrorCode::DocumentStoreError);
    }

    #[test]
    fn model_errors_keep_their_message() {
        let err: TicketError = ModelError::unavailable("overloaded").into();
        assert_eq!(err.code(), ErrorCode::ModelBackendError);
        assert!(err.to_string().contains("overloaded"));
    }
}
