//! Visualization adapter: owns one rendering surface and its state.
//!
//! Every `render` call fully replaces the previous visualization. A new
//! request supersedes any in-progress one: results are applied only if their
//! request sequence number still matches the latest issued request, so a slow
//! earlier render can never overwrite a faster later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::VizError;
use crate::renderer::{GraphRenderer, RenderOutcome, TextRenderer};
use crate::surface::Surface;

/// One render request issued against the surface.
#[derive(Clone, Debug)]
pub struct VisualizationRequest {
    pub id: Uuid,
    pub seq: u64,
    pub query: String,
    pub issued_at: DateTime<Utc>,
}

/// Where the adapter is in its render lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPhase {
    /// Nothing has ever been rendered.
    Empty,
    /// A render is in progress.
    Loading,
    /// The last render completed (drawn graph or textual fallback).
    Rendered,
    /// The last render failed; `error` carries the message.
    Failed,
}

/// Structured record captured on render failure.
///
/// Exposed only when the debug-visibility flag is set; never shown by default.
#[derive(Clone, Debug, Serialize)]
pub struct DebugSnapshot {
    pub query: String,
    pub surface_width: u32,
    pub surface_height: u32,
    pub raw_error: String,
    pub captured_at: DateTime<Utc>,
}

/// Observable adapter state.
#[derive(Clone, Debug)]
pub struct VizState {
    pub phase: RenderPhase,
    pub last_request: Option<VisualizationRequest>,
    pub outcome: Option<RenderOutcome>,
    pub error: Option<String>,
    pub(crate) debug: Option<DebugSnapshot>,
}

impl VizState {
    fn empty() -> Self {
        Self {
            phase: RenderPhase::Empty,
            last_request: None,
            outcome: None,
            error: None,
            debug: None,
        }
    }
}

/// Owns one rendering surface and drives the external renderer against it.
pub struct VisualizationAdapter {
    renderer: Arc<dyn GraphRenderer>,
    surface: Arc<Surface>,
    show_debug: bool,
    seq: AtomicU64,
    state: Mutex<VizState>,
}

impl VisualizationAdapter {
    pub fn new(renderer: Arc<dyn GraphRenderer>, surface: Arc<Surface>, show_debug: bool) -> Self {
        Self {
            renderer,
            surface,
            show_debug,
            seq: AtomicU64::new(0),
            state: Mutex::new(VizState::empty()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> VizState {
        self.state.lock().expect("viz state mutex poisoned").clone()
    }

    /// The debug snapshot of the last failure, if debug visibility is enabled.
    pub fn debug_snapshot(&self) -> Option<DebugSnapshot> {
        if !self.show_debug {
            return None;
        }
        self.state
            .lock()
            .expect("viz state mutex poisoned")
            .debug
            .clone()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Render `query`, replacing whatever is currently shown.
    ///
    /// An empty query is rejected into the error state without touching the
    /// renderer. Prior error and debug state are reset at the start of every
    /// accepted request.
    pub async fn render(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            tracing::warn!("Render rejected: empty query");
            let mut state = self.state.lock().expect("viz state mutex poisoned");
            state.phase = RenderPhase::Failed;
            state.error = Some(VizError::EmptyQuery.to_string());
            state.debug = None;
            state.outcome = None;
            return;
        }

        let seq = self.seq.fetch_add(1, Ordering::AcqRel) + 1;
        let request = VisualizationRequest {
            id: Uuid::new_v4(),
            seq,
            query: query.to_string(),
            issued_at: Utc::now(),
        };
        tracing::debug!(request_id = %request.id, seq, "Render requested");
        {
            let mut state = self.state.lock().expect("viz state mutex poisoned");
            state.phase = RenderPhase::Loading;
            state.error = None;
            state.debug = None;
            state.last_request = Some(request);
        }

        // The surface may not be attached yet; give the layout one tick.
        if !self.surface.is_attached() {
            tokio::task::yield_now().await;
            if !self.surface.is_attached() {
                self.fail(
                    seq,
                    query,
                    VizError::SurfaceUnavailable(format!(
                        "surface '{}' is not attached",
                        self.surface.name()
                    )),
                );
                return;
            }
        }

        // Full replacement: old content goes before the new query is applied.
        if let Err(e) = self.renderer.clear(&self.surface).await {
            tracing::debug!(error = %e, "Pre-render clear failed");
        }

        let result = self.renderer.render(query, &self.surface).await;

        if !self.is_current(seq) {
            tracing::debug!(seq, "Dropping stale render result");
            return;
        }

        match result {
            Ok(outcome) => {
                tracing::debug!(renderer = self.renderer.name(), "Render completed");
                let mut state = self.state.lock().expect("viz state mutex poisoned");
                state.phase = RenderPhase::Rendered;
                state.outcome = Some(outcome);
            }
            Err(VizError::RendererUnavailable(reason)) => {
                // Degrade to the minimal textual presentation; the caller
                // still sees a completed render.
                tracing::warn!(reason = %reason, "Renderer unavailable; using textual fallback");
                let mut state = self.state.lock().expect("viz state mutex poisoned");
                state.phase = RenderPhase::Rendered;
                state.outcome = Some(RenderOutcome::Text {
                    body: TextRenderer::present(query),
                });
            }
            Err(e) => self.fail(seq, query, e),
        }
    }

    /// Re-issue the last render. No-op if no query has ever been set.
    pub async fn rerender(&self) {
        let query = self
            .state
            .lock()
            .expect("viz state mutex poisoned")
            .last_request
            .as_ref()
            .map(|r| r.query.clone());
        match query {
            Some(q) => self.render(&q).await,
            None => tracing::debug!("Rerender skipped: no query has been set"),
        }
    }

    /// Clear the surface and reset to the empty state.
    ///
    /// Also supersedes any in-flight render so its result is dropped.
    pub async fn clear(&self) {
        self.seq.fetch_add(1, Ordering::AcqRel);
        if let Err(e) = self.renderer.clear(&self.surface).await {
            tracing::debug!(error = %e, "Clear failed");
        }
        *self.state.lock().expect("viz state mutex poisoned") = VizState::empty();
    }

    fn is_current(&self, seq: u64) -> bool {
        self.seq.load(Ordering::Acquire) == seq
    }

    fn fail(&self, seq: u64, query: &str, error: VizError) {
        if !self.is_current(seq) {
            return;
        }
        let (width, height) = self.surface.dimensions();
        tracing::warn!(error = %error, "Render failed");
        let mut state = self.state.lock().expect("viz state mutex poisoned");
        state.phase = RenderPhase::Failed;
        state.error = Some(error.to_string());
        state.outcome = None;
        state.debug = Some(DebugSnapshot {
            query: query.to_string(),
            surface_width: width,
            surface_height: height,
            raw_error: format!("{:?}", error),
            captured_at: Utc::now(),
        });
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Renderer whose behavior is scripted per call.
    struct MockRenderer {
        render_calls: AtomicUsize,
        clear_calls: AtomicUsize,
        last_query: Mutex<Option<String>>,
        /// Delay applied when the query contains "slow".
        slow_delay: Duration,
        fail_with: Mutex<Option<VizError>>,
    }

    impl MockRenderer {
        fn new() -> Self {
            Self {
                render_calls: AtomicUsize::new(0),
                clear_calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
                slow_delay: Duration::from_millis(50),
                fail_with: Mutex::new(None),
            }
        }

        fn failing(error: VizError) -> Self {
            let mock = Self::new();
            *mock.fail_with.lock().unwrap() = Some(error);
            mock
        }

        fn render_count(&self) -> usize {
            self.render_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GraphRenderer for MockRenderer {
        fn name(&self) -> &str {
            "mock"
        }

        async fn render(&self, query: &str, _surface: &Surface) -> Result<RenderOutcome, VizError> {
            self.render_calls.fetch_add(1, Ordering::SeqCst);
            if query.contains("slow") {
                tokio::time::sleep(self.slow_delay).await;
            }
            if let Some(err) = self.fail_with.lock().unwrap().take() {
                return Err(err);
            }
            *self.last_query.lock().unwrap() = Some(query.to_string());
            Ok(RenderOutcome::Graph {
                summary: format!("rendered: {}", query),
            })
        }

        async fn clear(&self, _surface: &Surface) -> Result<(), VizError> {
            self.clear_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn attached_surface() -> Arc<Surface> {
        let surface = Arc::new(Surface::new("main"));
        surface.attach(800, 600);
        surface
    }

    fn adapter_with(renderer: Arc<MockRenderer>) -> VisualizationAdapter {
        VisualizationAdapter::new(renderer, attached_surface(), false)
    }

    // ---- Empty query ----

    #[tokio::test]
    async fn test_empty_query_rejected_without_touching_renderer() {
        let renderer = Arc::new(MockRenderer::new());
        let adapter = adapter_with(Arc::clone(&renderer));

        adapter.render("   ").await;

        let state = adapter.state();
        assert_eq!(state.phase, RenderPhase::Failed);
        assert!(state.error.unwrap().contains("empty query"));
        assert_eq!(renderer.render_count(), 0);
    }

    // ---- Successful render ----

    #[tokio::test]
    async fn test_render_success() {
        let renderer = Arc::new(MockRenderer::new());
        let adapter = adapter_with(Arc::clone(&renderer));

        adapter.render("MATCH (n) RETURN n").await;

        let state = adapter.state();
        assert_eq!(state.phase, RenderPhase::Rendered);
        assert!(state.error.is_none());
        assert_eq!(
            state.last_request.unwrap().query,
            "MATCH (n) RETURN n"
        );
        assert_eq!(renderer.render_count(), 1);
        // Full replacement: the surface was cleared before the render.
        assert_eq!(renderer.clear_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_render_resets_prior_error() {
        let renderer = Arc::new(MockRenderer::new());
        let adapter = adapter_with(Arc::clone(&renderer));

        adapter.render("").await;
        assert!(adapter.state().error.is_some());

        adapter.render("MATCH (n) RETURN n").await;
        let state = adapter.state();
        assert_eq!(state.phase, RenderPhase::Rendered);
        assert!(state.error.is_none());
    }

    // ---- Renderer failure ----

    #[tokio::test]
    async fn test_render_failure_sets_error_state() {
        let renderer = Arc::new(MockRenderer::failing(VizError::RenderFailed(
            "malformed query".to_string(),
        )));
        let adapter = adapter_with(Arc::clone(&renderer));

        adapter.render("MATCH bogus").await;

        let state = adapter.state();
        assert_eq!(state.phase, RenderPhase::Failed);
        assert!(state.error.unwrap().contains("malformed query"));
        assert!(state.outcome.is_none());
    }

    #[tokio::test]
    async fn test_debug_snapshot_hidden_by_default() {
        let renderer = Arc::new(MockRenderer::failing(VizError::RenderFailed(
            "boom".to_string(),
        )));
        let adapter = adapter_with(Arc::clone(&renderer));

        adapter.render("MATCH (n) RETURN n").await;
        assert!(adapter.debug_snapshot().is_none());
    }

    #[tokio::test]
    async fn test_debug_snapshot_exposed_when_enabled() {
        let renderer = Arc::new(MockRenderer::failing(VizError::RenderFailed(
            "boom".to_string(),
        )));
        let adapter = VisualizationAdapter::new(renderer, attached_surface(), true);

        adapter.render("MATCH (n) RETURN n").await;

        let snapshot = adapter.debug_snapshot().unwrap();
        assert_eq!(snapshot.query, "MATCH (n) RETURN n");
        assert_eq!(snapshot.surface_width, 800);
        assert_eq!(snapshot.surface_height, 600);
        assert!(snapshot.raw_error.contains("boom"));
    }

    // ---- Fallback on unavailable renderer ----

    #[tokio::test]
    async fn test_unavailable_renderer_degrades_to_text() {
        let renderer = Arc::new(MockRenderer::failing(VizError::RendererUnavailable(
            "library failed to load".to_string(),
        )));
        let adapter = adapter_with(Arc::clone(&renderer));

        adapter.render("MATCH (n) RETURN n").await;

        let state = adapter.state();
        // Render completed from the caller's perspective, not an error.
        assert_eq!(state.phase, RenderPhase::Rendered);
        assert!(state.error.is_none());
        match state.outcome.unwrap() {
            RenderOutcome::Text { body } => assert!(body.contains("MATCH (n) RETURN n")),
            other => panic!("expected textual fallback, got {:?}", other),
        }
    }

    // ---- Detached surface ----

    #[tokio::test]
    async fn test_detached_surface_fails_descriptively() {
        let renderer = Arc::new(MockRenderer::new());
        let surface = Arc::new(Surface::new("sidebar"));
        let adapter = VisualizationAdapter::new(Arc::clone(&renderer) as _, surface, false);

        adapter.render("MATCH (n) RETURN n").await;

        let state = adapter.state();
        assert_eq!(state.phase, RenderPhase::Failed);
        assert!(state.error.unwrap().contains("sidebar"));
        assert_eq!(renderer.render_count(), 0);
    }

    // ---- Supersession ----

    #[tokio::test]
    async fn test_later_render_supersedes_slow_earlier_one() {
        let renderer = Arc::new(MockRenderer::new());
        let adapter = Arc::new(adapter_with(Arc::clone(&renderer)));

        let slow = {
            let adapter = Arc::clone(&adapter);
            tokio::spawn(async move { adapter.render("MATCH (slow) RETURN s").await })
        };
        // Let the slow render get in flight before issuing the fast one.
        tokio::time::sleep(Duration::from_millis(10)).await;
        adapter.render("MATCH (fast) RETURN f").await;
        slow.await.unwrap();

        let state = adapter.state();
        assert_eq!(state.phase, RenderPhase::Rendered);
        assert_eq!(state.last_request.unwrap().query, "MATCH (fast) RETURN f");
        match state.outcome.unwrap() {
            RenderOutcome::Graph { summary } => assert!(summary.contains("fast")),
            other => panic!("expected graph outcome, got {:?}", other),
        }
        assert_eq!(renderer.render_count(), 2);
    }

    // ---- Rerender ----

    #[tokio::test]
    async fn test_rerender_without_query_is_noop() {
        let renderer = Arc::new(MockRenderer::new());
        let adapter = adapter_with(Arc::clone(&renderer));

        adapter.rerender().await;

        assert_eq!(adapter.state().phase, RenderPhase::Empty);
        assert_eq!(renderer.render_count(), 0);
    }

    #[tokio::test]
    async fn test_rerender_reissues_last_query() {
        let renderer = Arc::new(MockRenderer::new());
        let adapter = adapter_with(Arc::clone(&renderer));

        adapter.render("MATCH (n) RETURN n").await;
        adapter.rerender().await;

        assert_eq!(renderer.render_count(), 2);
        assert_eq!(
            renderer.last_query.lock().unwrap().as_deref(),
            Some("MATCH (n) RETURN n")
        );
    }

    // ---- Clear ----

    #[tokio::test]
    async fn test_clear_resets_state() {
        let renderer = Arc::new(MockRenderer::new());
        let adapter = adapter_with(Arc::clone(&renderer));

        adapter.render("MATCH (n) RETURN n").await;
        adapter.clear().await;

        let state = adapter.state();
        assert_eq!(state.phase, RenderPhase::Empty);
        assert!(state.last_request.is_none());
        assert!(state.outcome.is_none());
    }
}
