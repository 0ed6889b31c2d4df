//! Conversation orchestrator: drives one chat turn at a time.
//!
//! On each user turn the orchestrator appends the user message and a transient
//! "thinking" placeholder, calls the backend, appends the reply (or an error
//! turn), and forwards any returned graph query to the visualization adapter.
//! At most one backend call is ever in flight; a second submit while one is
//! pending is dropped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use graphista_backend::ChatBackend;
use graphista_core::types::Message;
use graphista_viz::VisualizationAdapter;

use crate::store::{InputBuffer, SessionStore};

/// What became of a `submit` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The turn completed and the reply was appended.
    Completed,
    /// The backend call failed; an error turn was appended.
    Failed,
    /// The trimmed input was empty; nothing happened.
    IgnoredEmpty,
    /// Another submission was already in flight; nothing happened.
    IgnoredBusy,
}

/// Coordinates the session store, the backend, and the visualization adapter.
pub struct ConversationOrchestrator {
    backend: Arc<dyn ChatBackend>,
    store: Arc<SessionStore>,
    input: Arc<InputBuffer>,
    viz: Arc<VisualizationAdapter>,
    in_flight: AtomicBool,
}

impl ConversationOrchestrator {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        store: Arc<SessionStore>,
        input: Arc<InputBuffer>,
        viz: Arc<VisualizationAdapter>,
    ) -> Self {
        Self {
            backend,
            store,
            input,
            viz,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a backend call is currently in flight.
    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Drain the shared input buffer and submit its contents as a turn.
    pub async fn submit_pending(&self) -> SubmitOutcome {
        let text = self.input.take();
        self.submit(&text).await
    }

    /// Submit one user turn.
    ///
    /// Empty (after trimming) input and submissions racing an in-flight turn
    /// are silent no-ops. On success the backend-assigned thread id is
    /// adopted and any returned graph query is rendered; on failure an error
    /// turn is appended and neither the thread id nor the visualization is
    /// touched. The in-flight flag is cleared on every exit path.
    pub async fn submit(&self, raw_text: &str) -> SubmitOutcome {
        let text = raw_text.trim();
        if text.is_empty() {
            return SubmitOutcome::IgnoredEmpty;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Submission dropped: a turn is already in flight");
            return SubmitOutcome::IgnoredBusy;
        }

        self.input.clear();
        self.store.append(Message::user(text));
        self.store.begin_thinking();

        let thread_id = self.store.thread_id();
        let result = self.backend.chat(text, thread_id.as_deref()).await;
        self.store.resolve_thinking();

        let outcome = match result {
            Ok(reply) => {
                self.store.append(Message::assistant(&reply.response));
                self.store.set_thread_id(&reply.thread_id);
                if let Some(query) = reply.visualization_query() {
                    tracing::info!(thread_id = %reply.thread_id, "Reply carries a graph query");
                    self.viz.render(query).await;
                }
                SubmitOutcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat turn failed");
                self.store.append(Message::assistant(format!(
                    "Sorry, something went wrong talking to the assistant: {}",
                    e
                )));
                SubmitOutcome::Failed
            }
        };

        self.in_flight.store(false, Ordering::Release);
        outcome
    }
}

// =============================================================================
// Tests
// =============================================================================
