use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Who authored a message in the conversation log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Typed or dictated input from the person at the keyboard.
    User,
    /// A reply from the reasoning backend.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

// =============================================================================
// Structs
// =============================================================================

/// One entry in the conversation log.
///
/// Messages are immutable once appended. The transient "thinking" placeholder
/// shown while a backend call is in flight is a `pending` assistant message;
/// it is removed (never mutated in place) when the real reply arrives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub rendered_at: DateTime<Utc>,
    /// True only for the transient placeholder entry.
    #[serde(default)]
    pub pending: bool,
}

impl Message {
    /// A user turn with the given content.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            rendered_at: Utc::now(),
            pending: false,
        }
    }

    /// An assistant turn with the given content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            rendered_at: Utc::now(),
            pending: false,
        }
    }

    /// The transient placeholder shown while a reply is in flight.
    pub fn thinking() -> Self {
        Self {
            role: Role::Assistant,
            content: "…".to_string(),
            rendered_at: Utc::now(),
            pending: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
