use thiserror::Error;

/// Top-level error type for the Graphista system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define their
/// own error types and implement `From<SubsystemError> for GraphistaError` so
/// that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphistaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for GraphistaError {
    fn from(err: toml::de::Error) -> Self {
        GraphistaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for GraphistaError {
    fn from(err: toml::ser::Error) -> Self {
        GraphistaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GraphistaError {
    fn from(err: serde_json::Error) -> Self {
        GraphistaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Graphista operations.
pub type Result<T> = std::result::Result<T, GraphistaError>;
