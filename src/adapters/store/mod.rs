//! Document store adapters.
//!
//! - `InMemoryDocumentStore` - process memory, for tests and development
//! - `FileDocumentStore` - YAML snapshot on disk
//!
//! Both share `TicketCollection` and the term-frequency similarity scoring.

mod collection;
mod file_document_store;
mod in_memory_document_store;
mod similarity;

pub use collection::{StoredMessage, TicketCollection};
pub use file_document_store::FileDocumentStore;
pub use in_memory_document_store::InMemoryDocumentStore;
pub use similarity::{cosine, rank_similar, term_frequencies};
