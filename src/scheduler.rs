/// Pattern scheduler: picks a playback strategy from the capability facts
/// and executes it.
///
/// NativeWaveform:   one waveform call (timings + amplitudes), fire-and-forget.
/// EmulatedSequence: for each event in order, buzz for its duration (if
///                   active) and then wait that long. Pauses only wait.
///                   Every wait races the cancel token.

use crate::actuator::Actuator;
use crate::cancel::CancelToken;
use crate::capability::{ActuatorKind, CapabilityFacts};
use crate::error::ActuatorError;
use crate::pattern::Pattern;
use tokio::time::{Duration, sleep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NativeWaveform,
    EmulatedSequence,
}

/// How an emulated sequence ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOutcome {
    Completed,
    Cancelled,
    Failed(ActuatorError),
}

/// Choose a strategy. `None` means there is nothing to drive.
pub fn select(caps: CapabilityFacts) -> Option<Strategy> {
    match caps.kind() {
        ActuatorKind::WaveformCapable => Some(Strategy::NativeWaveform),
        ActuatorKind::BinaryOnly => Some(Strategy::EmulatedSequence),
        ActuatorKind::Absent => None,
    }
}

/// Submit the whole pattern as one non-repeating waveform.
pub fn play_waveform(actuator: &dyn Actuator, pattern: &Pattern) -> Result<(), ActuatorError> {
    let waveform = pattern.waveform();
    actuator.actuate_waveform(&waveform.timings, &waveform.amplitudes)
}

/// Play a pattern step by step on an on/off motor.
/// Steps run strictly in pattern order; nothing runs once `token` is cancelled.
pub async fn play_sequence(actuator: &dyn Actuator, pattern: &Pattern, token: &CancelToken) -> SequenceOutcome {
    for event in pattern.events() {
        if event.is_active() {
            match token.run_unless_cancelled(|| actuator.actuate_once(event.duration_ms)) {
                None => return SequenceOutcome::Cancelled,
                Some(Err(e)) => return SequenceOutcome::Failed(e),
                Some(Ok(())) => {}
            }
        }
        tokio::select! {
            _ = sleep(Duration::from_millis(event.duration_ms)) => {}
            _ = token.cancelled() => return SequenceOutcome::Cancelled,
        }
    }
    if token.is_cancelled() {
        SequenceOutcome::Cancelled
    } else {
        SequenceOutcome::Completed
    }
}
