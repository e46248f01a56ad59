//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Model backends (Ollama/Llama, Gemini, mock)
//! - `store` - Document stores (YAML file, in-memory)
//! - `http` - REST API

pub mod ai;
pub mod http;
pub mod store;
