//! Speech session controller.
//!
//! Drives the state machine through SDK detection, token acquisition,
//! recognizer start/stop, and recognized-text delivery. Every failure path
//! lands back in a usable `Idle` or `Disabled` state; failures are surfaced
//! as a status line, never injected into the conversation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use graphista_backend::SpeechTokenProvider;
use graphista_session::InputBuffer;

use crate::error::SpeechError;
use crate::probe::{detect_sdk, SdkCapability, SdkProbe};
use crate::recognizer::{Recognizer, RecognizerFactory, UtteranceSink};
use crate::state::{SpeechState, StateMachine};

/// Owns the lifecycle of one voice-capture session.
///
/// Exactly one controller exists per page lifetime. The recognizer handle is
/// recreated on every start; a stopped session never reuses it.
pub struct SpeechSessionController {
    machine: StateMachine,
    capability: Mutex<SdkCapability>,
    tokens: Arc<dyn SpeechTokenProvider>,
    factory: Arc<dyn RecognizerFactory>,
    input: Arc<InputBuffer>,
    language: String,
    recognizer: tokio::sync::Mutex<Option<Box<dyn Recognizer>>>,
    status: Mutex<Option<String>>,
}

impl SpeechSessionController {
    pub fn new(
        tokens: Arc<dyn SpeechTokenProvider>,
        factory: Arc<dyn RecognizerFactory>,
        input: Arc<InputBuffer>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            machine: StateMachine::new(),
            capability: Mutex::new(SdkCapability::Absent),
            tokens,
            factory,
            input,
            language: language.into(),
            recognizer: tokio::sync::Mutex::new(None),
            status: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SpeechState {
        self.machine.current()
    }

    /// The current user-facing status line, if any.
    pub fn status(&self) -> Option<String> {
        self.status.lock().expect("status mutex poisoned").clone()
    }

    pub fn capability(&self) -> SdkCapability {
        *self.capability.lock().expect("capability mutex poisoned")
    }

    /// Run SDK-presence detection once, enabling the mic affordance only if
    /// the real library is found.
    ///
    /// Runs the bounded polling loop: `interval` between checks, give up
    /// after `timeout`. On anything but `Real` the session stays `Disabled`
    /// with a permanent status message and no further polling occurs.
    pub async fn initialize(&self, probe: &dyn SdkProbe, interval: Duration, timeout: Duration) {
        let observed = detect_sdk(probe, interval, timeout).await;
        *self.capability.lock().expect("capability mutex poisoned") = observed;
        match observed {
            SdkCapability::Real => {
                if self.machine.transition(SpeechState::Idle).is_ok() {
                    self.set_status(None);
                }
            }
            observed => {
                self.set_status(Some(unavailable_status(observed).to_string()));
            }
        }
    }

    /// Adopt a capability directly (for hosts that performed detection
    /// themselves).
    pub fn set_capability(&self, capability: SdkCapability) {
        *self.capability.lock().expect("capability mutex poisoned") = capability;
        if capability.is_usable() {
            let _ = self.machine.transition(SpeechState::Idle);
        }
    }

    /// The mic control: starts listening when idle, stops when listening.
    pub async fn toggle(&self) {
        match self.state() {
            SpeechState::Listening => {
                if let Err(e) = self.stop().await {
                    tracing::warn!(error = %e, "Stop failed");
                }
            }
            SpeechState::Idle | SpeechState::Disabled => {
                if let Err(e) = self.start().await {
                    tracing::warn!(error = %e, "Start failed");
                }
            }
            other => {
                tracing::debug!(state = %other, "Mic toggle ignored");
            }
        }
    }

    /// Start a new capture session: fetch a token, construct a recognizer,
    /// and begin continuous recognition.
    ///
    /// Requires a prior successful SDK-presence check. Falls back to
    /// `Disabled` if no token can be fetched; recognizer failures recover to
    /// `Idle`. Either way the failure is surfaced in the status line only.
    pub async fn start(&self) -> Result<(), SpeechError> {
        let capability = self.capability();
        if !capability.is_usable() {
            self.set_status(Some(unavailable_status(capability).to_string()));
            return Err(SpeechError::SdkUnavailable(
                "capability check has not passed".to_string(),
            ));
        }
        // From Idle, or from Disabled immediately after a successful check.
        if self.machine.transition(SpeechState::AcquiringToken).is_err() {
            tracing::debug!(state = %self.state(), "Start ignored");
            return Ok(());
        }

        let grant = match self.tokens.speech_token().await {
            Ok(grant) => grant,
            Err(e) => {
                // No token: the affordance goes dark until the user retries.
                let _ = self.machine.transition(SpeechState::Disabled);
                self.set_status(Some(format!("Voice input disabled: {}", e)));
                return Err(SpeechError::Token(e.to_string()));
            }
        };

        let sink: UtteranceSink = {
            let input = Arc::clone(&self.input);
            Arc::new(move |utterance: &str| input.append_utterance(utterance))
        };

        let mut recognizer = match self.factory.create(&grant, &self.language, sink).await {
            Ok(r) => r,
            Err(e) => {
                self.recover_to_idle(&format!("Could not create recognizer: {}", e));
                return Err(e);
            }
        };

        if let Err(e) = recognizer.start().await {
            self.recover_to_idle(&format!("Could not start recognition: {}", e));
            return Err(e);
        }

        *self.recognizer.lock().await = Some(recognizer);
        self.machine.transition(SpeechState::Listening)?;
        self.set_status(None);
        tracing::info!(language = %self.language, "Listening");
        Ok(())
    }

    /// Stop the capture session.
    ///
    /// Idempotent: calling it when not listening is a no-op. The recognizer
    /// handle is released even if the underlying stop call errors.
    pub async fn stop(&self) -> Result<(), SpeechError> {
        if self.state() != SpeechState::Listening {
            tracing::debug!(state = %self.state(), "Stop ignored");
            return Ok(());
        }
        self.machine.transition(SpeechState::Stopping)?;

        // Take the handle first so it is released no matter what follows.
        let handle = self.recognizer.lock().await.take();
        match handle {
            Some(mut recognizer) => match recognizer.stop().await {
                Ok(()) => {
                    self.machine.transition(SpeechState::Idle)?;
                    tracing::info!("Recognition stopped");
                    Ok(())
                }
                Err(e) => {
                    let _ = self.machine.transition(SpeechState::Error);
                    self.recover_to_idle(&format!("Recognition stop failed: {}", e));
                    Err(e)
                }
            },
            // The recognizer is already gone; stopping is still a success.
            None => {
                self.machine.transition(SpeechState::Idle)?;
                Ok(())
            }
        }
    }

    fn recover_to_idle(&self, status: &str) {
        // May arrive here from AcquiringToken or already in Error.
        let _ = self.machine.transition(SpeechState::Error);
        let _ = self.machine.transition(SpeechState::Idle);
        self.set_status(Some(status.to_string()));
        tracing::warn!(status, "Speech session recovered to Idle");
    }

    fn set_status(&self, status: Option<String>) {
        *self.status.lock().expect("status mutex poisoned") = status;
    }
}

/// User-facing line for a capability that cannot start recognition.
///
/// A mock stand-in is named as such so the message is distinguishable from
/// plain absence.
fn unavailable_status(capability: SdkCapability) -> &'static str {
    match capability {
        SdkCapability::Mock => {
            "Voice input unavailable: only a non-functional stand-in of the \
             speech SDK was found"
        }
        _ => "Voice input unavailable: speech SDK not found",
    }
}

// =============================================================================
// Tests
// =============================================================================
