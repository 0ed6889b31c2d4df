//! Conversation state and turn sequencing for Graphista.
//!
//! `SessionStore` holds the thread identity and the ordered message log;
//! `InputBuffer` is the single buffer shared by typed and spoken input;
//! `ConversationOrchestrator` drives one chat turn at a time against the
//! backend and forwards returned graph queries to the visualization adapter.

pub mod orchestrator;
pub mod store;

pub use orchestrator::{ConversationOrchestrator, SubmitOutcome};
pub use store::{InputBuffer, SessionStore};
