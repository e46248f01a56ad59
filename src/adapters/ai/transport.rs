//! HTTP error mapping shared by the model backends.

use reqwest::{Response, StatusCode};
use std::time::Duration;

use crate::ports::ModelError;

/// Maps a failed `send()` to a model error.
///
/// The request URL is stripped first; it can carry an API key.
pub(crate) fn send_error(err: reqwest::Error, timeout: Duration) -> ModelError {
    let err = err.without_url();
    if err.is_timeout() {
        ModelError::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    } else if err.is_connect() {
        ModelError::network(format!("Connection failed: {}", err))
    } else {
        ModelError::network(err.to_string())
    }
}

/// Maps a failed body decode to a model error, without the request URL.
pub(crate) fn decode_error(err: reqwest::Error) -> ModelError {
    ModelError::parse(format!("Failed to parse response: {}", err.without_url()))
}

/// Passes successful responses through and converts the rest to errors.
pub(crate) async fn check_status(response: Response) -> Result<Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, "model provider returned an error status");
    Err(status_error(status, body))
}

/// Error for a non-success status code.
pub(crate) fn status_error(status: StatusCode, body: String) -> ModelError {
    match status.as_u16() {
        401 | 403 => ModelError::AuthenticationFailed,
        429 => ModelError::RateLimited,
        400 => ModelError::InvalidRequest(body),
        500..=599 => ModelError::unavailable(format!("Server error {}: {}", status, body)),
        _ => ModelError::network(format!("Unexpected status {}: {}", status, body)),
    }
}
