//! Conversation identity, message log, and the shared input buffer.
//!
//! Pure data holders with no business logic. All mutations happen
//! synchronously under one lock, so typed and spoken writers never interleave
//! within a single update.

use std::sync::Mutex;

use graphista_core::types::Message;

#[derive(Debug, Default)]
struct StoreInner {
    thread_id: Option<String>,
    messages: Vec<Message>,
}

/// Holds the conversation's thread id and its ordered message log.
///
/// The thread id is pinned once set: the backend assigns it on the first
/// successful turn and later turns must echo the same id. Switching to a
/// different conversation requires the explicit `reset`.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<StoreInner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pinned thread id, if one has been assigned.
    pub fn thread_id(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("session store mutex poisoned")
            .thread_id
            .clone()
    }

    /// Pin the thread id. A differing id on an already-pinned store is
    /// ignored (and logged) rather than silently switching conversations.
    pub fn set_thread_id(&self, id: &str) {
        let mut inner = self.inner.lock().expect("session store mutex poisoned");
        match inner.thread_id.as_deref() {
            None => {
                tracing::debug!(thread_id = id, "Thread id pinned");
                inner.thread_id = Some(id.to_string());
            }
            Some(current) if current == id => {}
            Some(current) => {
                tracing::warn!(
                    current = current,
                    offered = id,
                    "Refusing to switch pinned thread id"
                );
            }
        }
    }

    /// Append a message to the log.
    pub fn append(&self, message: Message) {
        self.inner
            .lock()
            .expect("session store mutex poisoned")
            .messages
            .push(message);
    }

    /// Append the transient "thinking" placeholder.
    pub fn begin_thinking(&self) {
        self.append(Message::thinking());
    }

    /// Remove the transient placeholder, if present.
    ///
    /// The placeholder is removed, never mutated into the real reply.
    pub fn resolve_thinking(&self) {
        let mut inner = self.inner.lock().expect("session store mutex poisoned");
        inner.messages.retain(|m| !m.pending);
    }

    /// Ordered, read-only view of the message log.
    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .lock()
            .expect("session store mutex poisoned")
            .messages
            .clone()
    }

    pub fn message_count(&self) -> usize {
        self.inner
            .lock()
            .expect("session store mutex poisoned")
            .messages
            .len()
    }

    /// Drop the thread id and the message log: an explicit new conversation.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().expect("session store mutex poisoned");
        tracing::info!("Session reset");
        inner.thread_id = None;
        inner.messages.clear();
    }
}

/// The pending-input buffer shared by typed and spoken input.
///
/// Speech recognition appends recognized utterances; the keyboard replaces the
/// whole text. The orchestrator drains it at submit time.
#[derive(Debug, Default)]
pub struct InputBuffer {
    text: Mutex<String>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer with typed text.
    pub fn set(&self, text: &str) {
        *self.text.lock().expect("input buffer mutex poisoned") = text.to_string();
    }

    /// Append a recognized utterance, separated from any unsent text by a
    /// single space. Blank utterances are ignored.
    pub fn append_utterance(&self, utterance: &str) {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return;
        }
        let mut text = self.text.lock().expect("input buffer mutex poisoned");
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(utterance);
    }

    /// Current contents, without draining.
    pub fn snapshot(&self) -> String {
        self.text
            .lock()
            .expect("input buffer mutex poisoned")
            .clone()
    }

    /// Drain the buffer, returning its contents.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.text.lock().expect("input buffer mutex poisoned"))
    }

    pub fn clear(&self) {
        self.text
            .lock()
            .expect("input buffer mutex poisoned")
            .clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text
            .lock()
            .expect("input buffer mutex poisoned")
            .is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
