/// Haptic patterns: ordered (duration, intensity) events and the native
/// waveform built from them.
///
/// Order is playback order. Adjacent events are never merged, even when
/// they are identical.

use crate::intensity;
use serde_json::Value;

pub const DEFAULT_DURATION_MS: u64 = 50;
pub const DEFAULT_INTENSITY: f64 = 0.5;

/// One segment of a pattern. Intensity 0 is an explicit silent pause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticEvent {
    pub duration_ms: u64,
    pub intensity: f64,
}

impl HapticEvent {
    pub const fn new(duration_ms: u64, intensity: f64) -> Self {
        Self { duration_ms, intensity }
    }

    /// Decode one `{duration, intensity}` object from a command.
    /// A missing, null or unusable field takes its default; only a
    /// non-object entry is rejected (`None`).
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let duration_ms = fields
            .get("duration")
            .and_then(whole_millis)
            .unwrap_or(DEFAULT_DURATION_MS);
        let intensity = fields
            .get("intensity")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_INTENSITY);
        Some(Self { duration_ms, intensity })
    }

    /// True if this segment drives the motor (as opposed to a pause).
    pub fn is_active(&self) -> bool {
        intensity::normalize(self.intensity) > 0.0
    }
}

/// Non-negative whole number of milliseconds, integer or float (`50.0`).
fn whole_millis(value: &Value) -> Option<u64> {
    if let Some(ms) = value.as_u64() {
        return Some(ms);
    }
    let ms = value.as_f64()?;
    (ms.is_finite() && ms >= 0.0 && ms.fract() == 0.0 && ms <= u64::MAX as f64).then_some(ms as u64)
}

/// Parallel timing/amplitude arrays for a single non-repeating waveform call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Waveform {
    pub timings: Vec<u64>,
    pub amplitudes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pattern(Vec<HapticEvent>);

impl Pattern {
    pub fn new(events: Vec<HapticEvent>) -> Self {
        Self(events)
    }

    pub fn events(&self) -> &[HapticEvent] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all segment durations in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.0.iter().map(|e| e.duration_ms).fold(0, u64::saturating_add)
    }

    /// Build the native waveform: pauses get amplitude 0, everything else
    /// goes through the intensity mapper.
    pub fn waveform(&self) -> Waveform {
        let timings = self.0.iter().map(|e| e.duration_ms).collect();
        let amplitudes = self
            .0
            .iter()
            .map(|e| intensity::waveform_amplitude(e.intensity))
            .collect();
        Waveform { timings, amplitudes }
    }
}

impl From<Vec<HapticEvent>> for Pattern {
    fn from(events: Vec<HapticEvent>) -> Self {
        Self(events)
    }
}
