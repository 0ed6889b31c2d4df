//! Reqwest-backed client for the reasoning backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::BackendError;
use crate::types::{ChatReply, ChatRequest, ExampleQuestion, SpeechTokenGrant};

/// The chat seam: one natural-language turn in, one reply out.
///
/// `ConversationOrchestrator` depends on this trait rather than on the
/// concrete client so that turn sequencing can be tested against mocks.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(
        &self,
        message: &str,
        thread_id: Option<&str>,
    ) -> Result<ChatReply, BackendError>;
}

/// The speech-token seam used by the speech session controller.
#[async_trait]
pub trait SpeechTokenProvider: Send + Sync {
    async fn speech_token(&self) -> Result<SpeechTokenGrant, BackendError>;
}

/// HTTP client for all backend endpoints.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(request_timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the ordered example questions used to seed suggestions.
    pub async fn examples(&self) -> Result<Vec<ExampleQuestion>, BackendError> {
        let response = self.http.get(self.url("/api/examples")).send().await?;
        let response = check_status(response).await?;
        let examples = response
            .json::<Vec<ExampleQuestion>>()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        tracing::debug!(count = examples.len(), "Fetched example questions");
        Ok(examples)
    }

    /// Fetch the knowledge-graph schema, optionally scoped by a query.
    ///
    /// The schema is opaque JSON; it is surfaced for operator inspection only.
    pub async fn schema(&self, query: Option<&str>) -> Result<serde_json::Value, BackendError> {
        let mut request = self.http.get(self.url("/api/neo4j/schema"));
        if let Some(q) = query {
            request = request.query(&[("query", q)]);
        }
        let response = check_status(request.send().await?).await?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }

    /// Run a graph query directly against the backend's database endpoint.
    ///
    /// Used by the textual fallback presentation to report result counts.
    pub async fn run_query(&self, query: &str) -> Result<serde_json::Value, BackendError> {
        let body = serde_json::json!({ "query": query });
        let response = self
            .http
            .post(self.url("/api/neo4j/query"))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl ChatBackend for BackendClient {
    async fn chat(
        &self,
        message: &str,
        thread_id: Option<&str>,
    ) -> Result<ChatReply, BackendError> {
        let request = ChatRequest {
            message: message.to_string(),
            thread_id: thread_id.map(str::to_string),
        };
        tracing::debug!(
            thread_id = thread_id.unwrap_or("<new>"),
            message_len = message.len(),
            "Sending chat turn"
        );

        let response = self
            .http
            .post(self.url("/api/chat"))
            .json(&request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let reply = response
            .json::<ChatReply>()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        tracing::debug!(
            thread_id = %reply.thread_id,
            has_query = reply.visualization_query().is_some(),
            "Chat reply received"
        );
        Ok(reply)
    }
}

#[async_trait]
impl SpeechTokenProvider for BackendClient {
    async fn speech_token(&self) -> Result<SpeechTokenGrant, BackendError> {
        let response = self.http.get(self.url("/api/speech-token")).send().await?;
        let response = check_status(response).await?;
        let grant = response
            .json::<SpeechTokenGrant>()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        if !grant.is_usable() {
            let reason = grant
                .error
                .clone()
                .unwrap_or_else(|| "no token issued".to_string());
            return Err(BackendError::SpeechUnavailable(reason));
        }
        Ok(grant)
    }
}

/// Treat any non-2xx status as a failure, carrying the response body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "Backend request failed");
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_strips_trailing_slashes() {
        let client =
            BackendClient::new("http://localhost:5000///", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/api/chat"), "http://localhost:5000/api/chat");
    }

    #[test]
    fn test_client_url_join() {
        let client = BackendClient::new("http://graph.example", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url("/api/speech-token"),
            "http://graph.example/api/speech-token"
        );
    }

    // Network behavior (non-2xx handling, wire decoding) is exercised through
    // the mock `ChatBackend` implementations in graphista-session's tests.
}
