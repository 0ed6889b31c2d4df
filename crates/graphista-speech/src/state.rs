//! Speech session state machine with thread-safe transitions.
//!
//! Enforces valid state transitions for the voice-capture lifecycle:
//! - Disabled -> Idle (SDK confirmed present)
//! - Disabled/Idle -> AcquiringToken (mic pressed)
//! - AcquiringToken -> Listening (token fetched, recognizer started)
//! - AcquiringToken -> Disabled (no token could be fetched)
//! - Listening -> Stopping -> Idle (mic pressed again)
//! - AcquiringToken/Listening/Stopping -> Error -> Idle or Disabled (recovery)

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::SpeechError;

/// Operational state of the speech session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeechState {
    /// No token, or the SDK was confirmed absent. Nothing can start.
    Disabled,
    /// SDK present and ready; not listening.
    Idle,
    /// Fetching a service token before recognition can begin.
    AcquiringToken,
    /// Continuous recognition is running.
    Listening,
    /// A stop was requested and is being carried out.
    Stopping,
    /// A start/stop failure occurred; the session recovers from here.
    Error,
}

impl fmt::Display for SpeechState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechState::Disabled => write!(f, "Disabled"),
            SpeechState::Idle => write!(f, "Idle"),
            SpeechState::AcquiringToken => write!(f, "AcquiringToken"),
            SpeechState::Listening => write!(f, "Listening"),
            SpeechState::Stopping => write!(f, "Stopping"),
            SpeechState::Error => write!(f, "Error"),
        }
    }
}

impl SpeechState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SpeechState) -> bool {
        use SpeechState::*;
        matches!(
            (self, target),
            (Disabled, Idle)
                | (Disabled, AcquiringToken)
                | (Idle, AcquiringToken)
                | (AcquiringToken, Listening)
                | (AcquiringToken, Disabled)
                | (AcquiringToken, Error)
                | (Listening, Stopping)
                | (Listening, Error)
                | (Stopping, Idle)
                | (Stopping, Error)
                // Recovery: the session never stays stuck in Error.
                | (Error, Idle)
                | (Error, Disabled)
        )
    }
}

/// Thread-safe state machine for the speech session.
///
/// All transitions are validated before being applied, returning an error if
/// the requested transition is not permitted from the current state.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: Arc<Mutex<SpeechState>>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine initialized to `Disabled`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SpeechState::Disabled)),
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> SpeechState {
        *self.state.lock().expect("speech state mutex poisoned")
    }

    /// Attempt to transition to the target state.
    pub fn transition(&self, target: SpeechState) -> Result<(), SpeechError> {
        let mut state = self.state.lock().expect("speech state mutex poisoned");
        if state.can_transition_to(&target) {
            tracing::debug!("Speech state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(SpeechError::InvalidTransition {
                from: *state,
                to: target,
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(SpeechState::Disabled.to_string(), "Disabled");
        assert_eq!(SpeechState::Idle.to_string(), "Idle");
        assert_eq!(SpeechState::AcquiringToken.to_string(), "AcquiringToken");
        assert_eq!(SpeechState::Listening.to_string(), "Listening");
        assert_eq!(SpeechState::Stopping.to_string(), "Stopping");
        assert_eq!(SpeechState::Error.to_string(), "Error");
    }

    #[test]
    fn test_valid_transitions() {
        use SpeechState::*;

        // Enablement and start path
        assert!(Disabled.can_transition_to(&Idle));
        assert!(Disabled.can_transition_to(&AcquiringToken));
        assert!(Idle.can_transition_to(&AcquiringToken));
        assert!(AcquiringToken.can_transition_to(&Listening));

        // Token failure falls back to Disabled
        assert!(AcquiringToken.can_transition_to(&Disabled));

        // Stop path
        assert!(Listening.can_transition_to(&Stopping));
        assert!(Stopping.can_transition_to(&Idle));

        // Error recovery
        assert!(AcquiringToken.can_transition_to(&Error));
        assert!(Listening.can_transition_to(&Error));
        assert!(Stopping.can_transition_to(&Error));
        assert!(Error.can_transition_to(&Idle));
        assert!(Error.can_transition_to(&Disabled));
    }

    #[test]
    fn test_invalid_transitions() {
        use SpeechState::*;

        // Cannot skip states
        assert!(!Disabled.can_transition_to(&Listening));
        assert!(!Idle.can_transition_to(&Listening));
        assert!(!Idle.can_transition_to(&Stopping));
        assert!(!AcquiringToken.can_transition_to(&Stopping));

        // Cannot go backwards arbitrarily
        assert!(!Listening.can_transition_to(&AcquiringToken));
        assert!(!Listening.can_transition_to(&Idle));
        assert!(!Stopping.can_transition_to(&Listening));

        // Cannot transition to self
        for state in [Disabled, Idle, AcquiringToken, Listening, Stopping, Error] {
            assert!(!state.can_transition_to(&state));
        }
    }

    #[test]
    fn test_state_machine_starts_disabled() {
        let sm = StateMachine::new();
        assert_eq!(sm.current(), SpeechState::Disabled);
    }

    #[test]
    fn test_state_machine_happy_path() {
        let sm = StateMachine::new();
        sm.transition(SpeechState::Idle).unwrap();
        sm.transition(SpeechState::AcquiringToken).unwrap();
        sm.transition(SpeechState::Listening).unwrap();
        sm.transition(SpeechState::Stopping).unwrap();
        sm.transition(SpeechState::Idle).unwrap();
        assert_eq!(sm.current(), SpeechState::Idle);
    }

    #[test]
    fn test_state_machine_token_failure_path() {
        let sm = StateMachine::new();
        sm.transition(SpeechState::Idle).unwrap();
        sm.transition(SpeechState::AcquiringToken).unwrap();
        sm.transition(SpeechState::Disabled).unwrap();
        assert_eq!(sm.current(), SpeechState::Disabled);
    }

    #[test]
    fn test_state_machine_error_recovery() {
        let sm = StateMachine::new();
        sm.transition(SpeechState::Idle).unwrap();
        sm.transition(SpeechState::AcquiringToken).unwrap();
        sm.transition(SpeechState::Error).unwrap();
        sm.transition(SpeechState::Idle).unwrap();
        assert_eq!(sm.current(), SpeechState::Idle);
    }

    #[test]
    fn test_state_machine_invalid_transition_keeps_state() {
        let sm = StateMachine::new();
        let result = sm.transition(SpeechState::Listening);
        assert!(result.is_err());
        assert_eq!(sm.current(), SpeechState::Disabled);
    }

    #[test]
    fn test_state_machine_clone_is_shared() {
        let sm1 = StateMachine::new();
        let sm2 = sm1.clone();
        sm1.transition(SpeechState::Idle).unwrap();
        assert_eq!(sm2.current(), SpeechState::Idle);
    }

    #[test]
    fn test_transition_error_names_both_states() {
        let sm = StateMachine::new();
        let err = sm.transition(SpeechState::Stopping).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Disabled"));
        assert!(msg.contains("Stopping"));
    }
}
