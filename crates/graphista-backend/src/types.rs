//! Wire types for the reasoning backend HTTP interface.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Conversation correlation id; `None` on the first turn, after which the
    /// backend-assigned id is echoed back on every call.
    pub thread_id: Option<String>,
}

/// Response of `POST /api/chat`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatReply {
    /// The assistant's natural-language reply.
    pub response: String,
    /// Backend-assigned conversation id (created on the first turn).
    pub thread_id: String,
    /// Graph query extracted from the reply, if the backend found one worth
    /// visualizing. Opaque to the client beyond being a string.
    pub cypher_query: Option<String>,
}

impl ChatReply {
    /// The query to forward to the visualization layer, if any.
    ///
    /// Whitespace-only queries are treated as absent.
    pub fn visualization_query(&self) -> Option<&str> {
        self.cypher_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Response of `GET /api/speech-token`.
///
/// The backend returns either a usable grant or a record carrying an `error`
/// field (and an empty token). Absence of a token means speech is unavailable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeechTokenGrant {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, rename = "endpointId")]
    pub endpoint_id: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl SpeechTokenGrant {
    /// Whether this grant can actually be used to start recognition.
    pub fn is_usable(&self) -> bool {
        !self.token.is_empty() && self.error.is_none()
    }
}

/// One entry of `GET /api/examples`: a suggested question, optionally paired
/// with a pre-baked graph query.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "ExampleQuestionWire")]
pub struct ExampleQuestion {
    pub question: String,
    pub cypher: Option<String>,
}

/// Older backend deployments return bare strings instead of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExampleQuestionWire {
    Plain(String),
    Record {
        question: String,
        #[serde(default)]
        cypher: Option<String>,
    },
}

impl From<ExampleQuestionWire> for ExampleQuestion {
    fn from(wire: ExampleQuestionWire) -> Self {
        match wire {
            ExampleQuestionWire::Plain(question) => Self {
                question,
                cypher: None,
            },
            ExampleQuestionWire::Record { question, cypher } => Self { question, cypher },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
