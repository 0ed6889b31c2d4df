//! HTTP client for the reasoning backend.
//!
//! The backend is an opaque request/response service: it maps natural-language
//! messages to replies and, when relevant, to a graph query string. This crate
//! owns the wire types and the `ChatBackend` / `SpeechTokenProvider` trait
//! seams that the rest of the system depends on.

pub mod client;
pub mod error;
pub mod types;

pub use client::{BackendClient, ChatBackend, SpeechTokenProvider};
pub use error::BackendError;
pub use types::{ChatReply, ChatRequest, ExampleQuestion, SpeechTokenGrant};
