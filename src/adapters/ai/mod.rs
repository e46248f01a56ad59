//! Model backend adapters.
//!
//! Implementations of the ModelBackend port.
//!
//! ## Available Adapters
//!
//! - `OpenAiCompatibleBackend` - Llama via Ollama or any OpenAI-compatible server
//! - `GeminiBackend` - Google Gemini REST API
//! - `ConfiguredModelBackend` - Startup-time selection between the above
//! - `MockModelBackend` - Scripted backend for testing

mod configured;
mod gemini;
mod mock_backend;
mod openai_compatible;
mod transport;

pub use configured::ConfiguredModelBackend;
pub use gemini::{flatten_transcript, GeminiBackend, GeminiConfig};
pub use mock_backend::{MockModelBackend, DEFAULT_MOCK_REPLY};
pub use openai_compatible::{OpenAiCompatibleBackend, OpenAiCompatibleConfig};
