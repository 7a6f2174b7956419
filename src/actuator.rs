/// Actuator seam: the only way the engine touches vibration hardware.
///
/// A platform adapter implements [`Actuator`] and reports its capability on
/// every call to `capabilities()`. Only the session controller calls the
/// actuation primitives.

use crate::capability::{ActuatorKind, CapabilityFacts};
use crate::error::ActuatorError;
use std::sync::{Mutex, PoisonError};

pub trait Actuator: Send + Sync {
    /// Current capability snapshot. Called once per request, never cached.
    fn capabilities(&self) -> CapabilityFacts;

    /// Play one non-repeating waveform. Only valid with amplitude control.
    fn actuate_waveform(&self, timings: &[u64], amplitudes: &[u8]) -> Result<(), ActuatorError>;

    /// Turn the motor fully on for `duration_ms`.
    fn actuate_once(&self, duration_ms: u64) -> Result<(), ActuatorError>;

    /// Stop any ongoing vibration. Best-effort: the hardware may not stop
    /// immediately.
    fn stop(&self) -> Result<(), ActuatorError>;
}

/// Host adapter without real hardware: capability comes from config and
/// every primitive call is reported through the log.
pub struct SimulatedActuator {
    kind: Mutex<ActuatorKind>,
}

impl SimulatedActuator {
    pub fn new(kind: ActuatorKind) -> Self {
        Self { kind: Mutex::new(kind) }
    }

    pub fn kind(&self) -> ActuatorKind {
        *self.kind.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap the simulated hardware, e.g. to emulate the motor going away.
    pub fn set_kind(&self, kind: ActuatorKind) {
        *self.kind.lock().unwrap_or_else(PoisonError::into_inner) = kind;
        log::info!("Simulated actuator is now {kind}");
    }
}

impl Actuator for SimulatedActuator {
    fn capabilities(&self) -> CapabilityFacts {
        self.kind().facts()
    }

    fn actuate_waveform(&self, timings: &[u64], amplitudes: &[u8]) -> Result<(), ActuatorError> {
        match self.kind() {
            ActuatorKind::WaveformCapable => {
                log::info!("[actuator] waveform timings={timings:?} amplitudes={amplitudes:?}");
                Ok(())
            }
            ActuatorKind::BinaryOnly => Err(ActuatorError::Waveform("no amplitude control".into())),
            ActuatorKind::Absent => Err(ActuatorError::Unavailable),
        }
    }

    fn actuate_once(&self, duration_ms: u64) -> Result<(), ActuatorError> {
        if self.kind() == ActuatorKind::Absent {
            return Err(ActuatorError::Unavailable);
        }
        log::info!("[actuator] on for {duration_ms}ms");
        Ok(())
    }

    fn stop(&self) -> Result<(), ActuatorError> {
        if self.kind() == ActuatorKind::Absent {
            return Err(ActuatorError::Unavailable);
        }
        log::info!("[actuator] stop");
        Ok(())
    }
}
