//! Error types for backend communication.

use graphista_core::error::GraphistaError;

/// Errors from the reasoning backend client.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("speech is unavailable: {0}")]
    SpeechUnavailable(String),
}

impl From<BackendError> for GraphistaError {
    fn from(err: BackendError) -> Self {
        GraphistaError::Backend(err.to_string())
    }
}
