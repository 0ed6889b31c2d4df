//! Voice-capture session management for Graphista.
//!
//! Owns the lifecycle of one speech session: SDK-presence detection, token
//! acquisition, recognizer start/stop, and delivery of recognized text into
//! the shared input buffer.

pub mod controller;
pub mod error;
pub mod probe;
pub mod recognizer;
pub mod state;

pub use controller::SpeechSessionController;
pub use error::SpeechError;
pub use probe::{detect_sdk, AbsentProbe, SdkCapability, SdkProbe};
pub use recognizer::{Recognizer, RecognizerFactory, UnavailableRecognizerFactory, UtteranceSink};
pub use state::{SpeechState, StateMachine};
