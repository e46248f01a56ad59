//! Mock model backend for testing.
//!
//! Provides a scripted implementation of the ModelBackend port so tests run
//! without a model server.
//!
//! # Features
//!
//! - Replies consumed in order, with a structured default once exhausted
//! - Error injection
//! - Simulated latency
//! - Call recording for verification
//!
//! # Example
//!
//! ```ignore
//! let backend = MockModelBackend::new()
//!     .with_reply(r#"{"answer": "Restart the router"}"#)
//!     .with_error(ModelError::RateLimited);
//!
//! let text = backend.complete(&messages).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ChatMessage, ModelBackend, ModelError, ProviderInfo};

/// Reply returned once the scripted queue is empty.
pub const DEFAULT_MOCK_REPLY: &str =
    r#"{"answer": "Mock response", "suggested_actions": [], "followup_questions": []}"#;

/// Scripted model backend.
#[derive(Debug, Clone)]
pub struct MockModelBackend {
    replies: Arc<Mutex<VecDeque<Result<String, ModelError>>>>,
    calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    delay: Duration,
    info: ProviderInfo,
}

impl Default for MockModelBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModelBackend {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
            info: ProviderInfo::new("mock", "mock-model-1"),
        }
    }

    /// Queues a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: ModelError) -> Self {
        self.push(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a reply on a shared handle.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.push(Ok(text.into()));
    }

    /// Queues a failure on a shared handle.
    pub fn push_error(&self, error: ModelError) {
        self.push(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Every conversation sent so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_call(&self) -> Option<Vec<ChatMessage>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn push(&self, reply: Result<String, ModelError>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    fn next_reply(&self) -> Result<String, ModelError> {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_MOCK_REPLY.to_string()))
    }
}

#[async_trait]
impl ModelBackend for MockModelBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(messages.to_vec());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_reply()
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
