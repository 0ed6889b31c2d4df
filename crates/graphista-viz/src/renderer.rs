//! The seam to the external graph-rendering library.

use async_trait::async_trait;

use crate::error::VizError;
use crate::surface::Surface;

/// What a completed render produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The library drew a graph; `summary` is a short human-readable line
    /// (e.g. node/edge counts) for logs and the status area.
    Graph { summary: String },
    /// A minimal textual presentation of the query was shown instead of a
    /// drawn graph.
    Text { body: String },
}

/// External graph renderer: accepts a query string and a surface handle.
///
/// Failures surface as errors; a renderer whose underlying library failed to
/// load reports `VizError::RendererUnavailable` and the adapter degrades to a
/// textual presentation.
#[async_trait]
pub trait GraphRenderer: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Render `query` into `surface`, replacing any previous content.
    async fn render(&self, query: &str, surface: &Surface) -> Result<RenderOutcome, VizError>;

    /// Remove any previously rendered content from `surface`.
    async fn clear(&self, surface: &Surface) -> Result<(), VizError>;
}

/// Built-in renderer that presents the query as text.
///
/// Serves terminal builds where no drawing library exists at all; it is also
/// the shape the adapter's degraded output takes when a real renderer's
/// library fails to load.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    /// The minimal textual presentation of a query.
    pub fn present(query: &str) -> String {
        format!("[graph query]\n{}", query.trim())
    }
}

#[async_trait]
impl GraphRenderer for TextRenderer {
    fn name(&self) -> &str {
        "text"
    }

    async fn render(&self, query: &str, _surface: &Surface) -> Result<RenderOutcome, VizError> {
        Ok(RenderOutcome::Text {
            body: Self::present(query),
        })
    }

    async fn clear(&self, _surface: &Surface) -> Result<(), VizError> {
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_renderer_renders_any_query() {
        let renderer = TextRenderer::new();
        let surface = Surface::new("main");
        let outcome = renderer
            .render("MATCH (n) RETURN n", &surface)
            .await
            .unwrap();
        match outcome {
            RenderOutcome::Text { body } => {
                assert!(body.contains("MATCH (n) RETURN n"));
            }
            other => panic!("expected textual outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_text_renderer_clear_is_ok() {
        let renderer = TextRenderer::new();
        let surface = Surface::new("main");
        assert!(renderer.clear(&surface).await.is_ok());
    }

    #[test]
    fn test_present_trims_query() {
        let body = TextRenderer::present("  MATCH (n) RETURN n  ");
        assert_eq!(body, "[graph query]\nMATCH (n) RETURN n");
    }
}
