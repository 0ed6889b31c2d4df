//! Error types for the visualization layer.

use graphista_core::error::GraphistaError;

/// Errors from rendering a graph query.
#[derive(Debug, thiserror::Error)]
pub enum VizError {
    #[error("cannot render an empty query")]
    EmptyQuery,
    #[error("rendering surface is unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("rendering library is unavailable: {0}")]
    RendererUnavailable(String),
    #[error("render failed: {0}")]
    RenderFailed(String),
}

impl From<VizError> for GraphistaError {
    fn from(err: VizError) -> Self {
        GraphistaError::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viz_error_display() {
        assert_eq!(
            VizError::EmptyQuery.to_string(),
            "cannot render an empty query"
        );
        assert_eq!(
            VizError::SurfaceUnavailable("detached".to_string()).to_string(),
            "rendering surface is unavailable: detached"
        );
        assert_eq!(
            VizError::RendererUnavailable("not loaded".to_string()).to_string(),
            "rendering library is unavailable: not loaded"
        );
        assert_eq!(
            VizError::RenderFailed("bad query".to_string()).to_string(),
            "render failed: bad query"
        );
    }

    #[test]
    fn test_into_graphista_error() {
        let top: GraphistaError = VizError::EmptyQuery.into();
        assert!(matches!(top, GraphistaError::Render(_)));
    }
}
