//! The on-screen region the external renderer draws into.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Handle to one rendering surface.
///
/// The surface may not be attached to the page yet when a render is requested;
/// the adapter tolerates that by yielding once to the next layout tick before
/// giving up.
#[derive(Debug)]
pub struct Surface {
    name: String,
    attached: AtomicBool,
    dimensions: Mutex<(u32, u32)>,
}

impl Surface {
    /// Create a detached surface with zero dimensions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attached: AtomicBool::new(false),
            dimensions: Mutex::new((0, 0)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach the surface with the given dimensions.
    pub fn attach(&self, width: u32, height: u32) {
        *self.dimensions.lock().expect("surface mutex poisoned") = (width, height);
        self.attached.store(true, Ordering::Release);
        tracing::debug!(surface = %self.name, width, height, "Surface attached");
    }

    /// Detach the surface (e.g. on page teardown).
    pub fn detach(&self) {
        self.attached.store(false, Ordering::Release);
        tracing::debug!(surface = %self.name, "Surface detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Current `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        *self.dimensions.lock().expect("surface mutex poisoned")
    }
}

// =============================================================================
// Tests
// =============================================================================
