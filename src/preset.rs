/// Preset library: semantic names → a single pulse or a canonical pattern.
///
///   light   → pulse 0.3 / 10ms
///   medium  → pulse 0.5 / 20ms
///   heavy   → pulse 0.8 / 30ms
///   short   → pulse (given or 0.5) / 50ms
///   long    → pulse (given or 0.5) / 200ms
///   success → 40ms@0.4, 60ms pause, 60ms@0.6
///   warning → 50ms@0.7, 50ms pause, 50ms@0.7
///   error   → 80ms@0.9, 40ms pause, 80ms@0.9, 40ms pause, 80ms@0.9
///
/// Unknown names are not an error: they fall back to a plain pulse built
/// from the given (or default) intensity and duration.

use crate::pattern::{DEFAULT_DURATION_MS, DEFAULT_INTENSITY, HapticEvent, Pattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Light,
    Medium,
    Heavy,
    Short,
    Long,
    Success,
    Warning,
    Error,
}

/// What a preset name resolves to. Independent of device capability.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetSpec {
    Pulse { intensity: f64, duration_ms: u64 },
    NamedPattern(Pattern),
}

const SUCCESS: [HapticEvent; 3] = [
    HapticEvent::new(40, 0.4),
    HapticEvent::new(60, 0.0),
    HapticEvent::new(60, 0.6),
];

const WARNING: [HapticEvent; 3] = [
    HapticEvent::new(50, 0.7),
    HapticEvent::new(50, 0.0),
    HapticEvent::new(50, 0.7),
];

const ERROR: [HapticEvent; 5] = [
    HapticEvent::new(80, 0.9),
    HapticEvent::new(40, 0.0),
    HapticEvent::new(80, 0.9),
    HapticEvent::new(40, 0.0),
    HapticEvent::new(80, 0.9),
];

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::Light,
        Preset::Medium,
        Preset::Heavy,
        Preset::Short,
        Preset::Long,
        Preset::Success,
        Preset::Warning,
        Preset::Error,
    ];

    /// Parse a preset name. Trims whitespace, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Preset::Light),
            "medium" => Some(Preset::Medium),
            "heavy" => Some(Preset::Heavy),
            "short" => Some(Preset::Short),
            "long" => Some(Preset::Long),
            "success" => Some(Preset::Success),
            "warning" => Some(Preset::Warning),
            "error" => Some(Preset::Error),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Light => "light",
            Preset::Medium => "medium",
            Preset::Heavy => "heavy",
            Preset::Short => "short",
            Preset::Long => "long",
            Preset::Success => "success",
            Preset::Warning => "warning",
            Preset::Error => "error",
        }
    }

    /// Resolve this preset. `intensity` only matters for `short`/`long`.
    pub fn spec(self, intensity: Option<f64>) -> PresetSpec {
        let given = intensity.unwrap_or(DEFAULT_INTENSITY);
        match self {
            Preset::Light => PresetSpec::pulse(0.3, 10),
            Preset::Medium => PresetSpec::pulse(0.5, 20),
            Preset::Heavy => PresetSpec::pulse(0.8, 30),
            Preset::Short => PresetSpec::pulse(given, 50),
            Preset::Long => PresetSpec::pulse(given, 200),
            Preset::Success => PresetSpec::NamedPattern(SUCCESS.to_vec().into()),
            Preset::Warning => PresetSpec::NamedPattern(WARNING.to_vec().into()),
            Preset::Error => PresetSpec::NamedPattern(ERROR.to_vec().into()),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl PresetSpec {
    fn pulse(intensity: f64, duration_ms: u64) -> Self {
        PresetSpec::Pulse { intensity, duration_ms }
    }

    /// Flatten into a playable pattern. A pulse always buzzes: an intensity
    /// of 0 is lifted to the weakest nonzero level instead of becoming a pause.
    pub fn into_pattern(self) -> Pattern {
        match self {
            PresetSpec::Pulse { intensity, duration_ms } => {
                let intensity = crate::intensity::normalize(intensity).max(f64::MIN_POSITIVE);
                Pattern::new(vec![HapticEvent::new(duration_ms, intensity)])
            }
            PresetSpec::NamedPattern(pattern) => pattern,
        }
    }
}

/// Expand a preset name. Pure; unknown names yield a default pulse.
pub fn expand(name: &str, intensity: Option<f64>, duration_ms: Option<u64>) -> PresetSpec {
    match Preset::parse(name) {
        Some(preset) => preset.spec(intensity),
        None => {
            log::debug!("Unknown preset {name:?}, using plain pulse");
            PresetSpec::pulse(
                intensity.unwrap_or(DEFAULT_INTENSITY),
                duration_ms.unwrap_or(DEFAULT_DURATION_MS),
            )
        }
    }
}
