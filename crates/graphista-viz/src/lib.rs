//! Graph visualization for Graphista.
//!
//! Owns one rendering surface: given a query string, (re)renders a subgraph
//! through an external renderer or reports a rendering error. A new render
//! request supersedes any in-progress one; stale results are dropped.

pub mod adapter;
pub mod error;
pub mod renderer;
pub mod surface;

pub use adapter::{
    DebugSnapshot, RenderPhase, VisualizationAdapter, VisualizationRequest, VizState,
};
pub use error::VizError;
pub use renderer::{GraphRenderer, RenderOutcome, TextRenderer};
pub use surface::Surface;
