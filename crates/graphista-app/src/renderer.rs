//! Terminal renderer backed by the query endpoint.
//!
//! The terminal build has no drawing library, so instead of plotting nodes it
//! runs the returned graph query against the backend and reports a result
//! summary. Connection failures degrade through the adapter's textual
//! fallback; query failures surface as render errors.

use async_trait::async_trait;

use graphista_backend::{BackendClient, BackendError};
use graphista_viz::{GraphRenderer, RenderOutcome, Surface, VizError};

pub struct QueryCountRenderer {
    client: BackendClient,
}

impl QueryCountRenderer {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn summarize(rows: &serde_json::Value) -> String {
        match rows {
            serde_json::Value::Array(items) => match items.len() {
                0 => "no results".to_string(),
                1 => "1 result row".to_string(),
                n => format!("{} result rows", n),
            },
            other => format!("result: {}", other),
        }
    }
}

#[async_trait]
impl GraphRenderer for QueryCountRenderer {
    fn name(&self) -> &str {
        "query-count"
    }

    async fn render(&self, query: &str, _surface: &Surface) -> Result<RenderOutcome, VizError> {
        match self.client.run_query(query).await {
            Ok(rows) => Ok(RenderOutcome::Graph {
                summary: Self::summarize(&rows),
            }),
            Err(BackendError::Http(e)) => Err(VizError::RendererUnavailable(e.to_string())),
            Err(e) => Err(VizError::RenderFailed(e.to_string())),
        }
    }

    async fn clear(&self, _surface: &Surface) -> Result<(), VizError> {
        // Nothing persists between presentations in the terminal.
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_counts_rows() {
        let rows = serde_json::json!([{"n": 1}, {"n": 2}, {"n": 3}]);
        assert_eq!(QueryCountRenderer::summarize(&rows), "3 result rows");
    }

    #[test]
    fn test_summarize_empty() {
        let rows = serde_json::json!([]);
        assert_eq!(QueryCountRenderer::summarize(&rows), "no results");
    }

    #[test]
    fn test_summarize_single() {
        let rows = serde_json::json!([{"n": 1}]);
        assert_eq!(QueryCountRenderer::summarize(&rows), "1 result row");
    }

    #[test]
    fn test_summarize_non_array() {
        let rows = serde_json::json!({"error": "syntax"});
        assert!(QueryCountRenderer::summarize(&rows).starts_with("result:"));
    }
}
