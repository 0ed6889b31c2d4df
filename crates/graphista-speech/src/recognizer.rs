//! The seam to the external speech-recognition SDK.
//!
//! Callback-style SDK calls are mapped to a uniform async contract: one
//! awaited outcome per start/stop, with recognized utterances delivered
//! through the sink as they arrive.

use async_trait::async_trait;
use std::sync::Arc;

use graphista_backend::SpeechTokenGrant;

use crate::error::SpeechError;

/// Receives each recognized utterance as it arrives.
pub type UtteranceSink = Arc<dyn Fn(&str) + Send + Sync>;

/// A running (or startable) continuous-recognition handle.
///
/// One recognizer serves one session; it is recreated, not reused, across
/// stop/start cycles.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Begin continuous recognition.
    async fn start(&mut self) -> Result<(), SpeechError>;

    /// Stop recognition. Must leave the handle releasable even on failure.
    async fn stop(&mut self) -> Result<(), SpeechError>;
}

/// Constructs recognizers from a token grant.
#[async_trait]
pub trait RecognizerFactory: Send + Sync {
    async fn create(
        &self,
        grant: &SpeechTokenGrant,
        language: &str,
        sink: UtteranceSink,
    ) -> Result<Box<dyn Recognizer>, SpeechError>;
}

/// Factory for builds without a speech SDK; always fails to construct.
#[derive(Debug, Default)]
pub struct UnavailableRecognizerFactory;

#[async_trait]
impl RecognizerFactory for UnavailableRecognizerFactory {
    async fn create(
        &self,
        _grant: &SpeechTokenGrant,
        _language: &str,
        _sink: UtteranceSink,
    ) -> Result<Box<dyn Recognizer>, SpeechError> {
        Err(SpeechError::SdkUnavailable(
            "no speech SDK in this build".to_string(),
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
