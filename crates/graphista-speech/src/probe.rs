//! SDK-presence detection.
//!
//! Whether the voice-capture library is actually usable cannot be inferred
//! from a naive "is the symbol defined" check: a stand-in implementation may
//! load first and expose the same names without doing anything. The probe
//! therefore reports a tri-state capability, and the detection loop only
//! accepts `Real`.

use std::time::Duration;

use tokio::time::Instant;

/// Result of one capability check against the voice-capture library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkCapability {
    /// The library is not present at all.
    Absent,
    /// A stand-in is present: it satisfies a presence check but carries the
    /// sentinel marking it non-functional. Treated the same as absent.
    Mock,
    /// The real library is present and its recognizer factory is callable.
    Real,
}

impl SdkCapability {
    /// Whether this capability allows recognition to start.
    pub fn is_usable(&self) -> bool {
        matches!(self, SdkCapability::Real)
    }
}

/// Capability probe over the ambient voice-capture library.
pub trait SdkProbe: Send + Sync {
    fn probe(&self) -> SdkCapability;
}

/// Probe for builds that ship no voice-capture library at all.
#[derive(Debug, Default)]
pub struct AbsentProbe;

impl SdkProbe for AbsentProbe {
    fn probe(&self) -> SdkCapability {
        SdkCapability::Absent
    }
}

/// Poll `probe` every `interval` until it reports `Real` or `timeout` elapses.
///
/// A `Mock` sighting does not end the loop early: the real library may still
/// load after the stand-in. The final observation is returned so the caller
/// can distinguish "never there" from "only the stand-in showed up".
pub async fn detect_sdk(
    probe: &dyn SdkProbe,
    interval: Duration,
    timeout: Duration,
) -> SdkCapability {
    let deadline = Instant::now() + timeout;
    let mut last = SdkCapability::Absent;
    loop {
        match probe.probe() {
            SdkCapability::Real => {
                tracing::info!("Voice-capture SDK detected");
                return SdkCapability::Real;
            }
            observed => last = observed,
        }
        if Instant::now() >= deadline {
            tracing::warn!(
                observed = ?last,
                timeout_ms = timeout.as_millis() as u64,
                "Voice-capture SDK not detected; giving up"
            );
            return last;
        }
        tokio::time::sleep(interval).await;
    }
}

// =============================================================================
// Tests
// =============================================================================
