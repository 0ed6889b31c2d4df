//! Error types for the speech subsystem.

use graphista_core::error::GraphistaError;

use crate::state::SpeechState;

/// Errors from the speech session.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("invalid speech state transition: {from} -> {to}")]
    InvalidTransition {
        from: SpeechState,
        to: SpeechState,
    },
    #[error("speech SDK is unavailable: {0}")]
    SdkUnavailable(String),
    #[error("token acquisition failed: {0}")]
    Token(String),
    #[error("recognizer error: {0}")]
    Recognizer(String),
}

impl From<SpeechError> for GraphistaError {
    fn from(err: SpeechError) -> Self {
        GraphistaError::Speech(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = SpeechError::InvalidTransition {
            from: SpeechState::Idle,
            to: SpeechState::Stopping,
        };
        assert_eq!(
            err.to_string(),
            "invalid speech state transition: Idle -> Stopping"
        );
    }

    #[test]
    fn test_sdk_unavailable_display() {
        let err = SpeechError::SdkUnavailable("not found after 5s".to_string());
        assert!(err.to_string().contains("not found after 5s"));
    }

    #[test]
    fn test_into_graphista_error() {
        let top: GraphistaError = SpeechError::Token("backend offline".to_string()).into();
        assert!(matches!(top, GraphistaError::Speech(_)));
        assert!(top.to_string().contains("backend offline"));
    }
}
