//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DocumentStore` - ticket/message persistence and similarity search
//! - `ModelBackend` - language-model completions

mod document_store;
mod model_backend;

pub use document_store::{DocumentStore, StoreError, TicketRecord};
pub use model_backend::{ChatMessage, ChatRole, ModelBackend, ModelError, ProviderInfo};
