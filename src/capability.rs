/// Capability facts: what the vibration hardware can do right now.
///
/// Supplied by the actuator adapter and re-read on every request, since
/// hardware can disappear between calls.
///
///   has_actuator = false           → Absent (everything degrades to a no-op)
///   has_amplitude_control = true   → WaveformCapable (one native waveform call)
///   otherwise                      → BinaryOnly (on/off, timing emulated)

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilityFacts {
    pub has_actuator: bool,
    pub has_amplitude_control: bool,
}

/// The three actuator classes the engine is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorKind {
    WaveformCapable,
    BinaryOnly,
    Absent,
}

impl CapabilityFacts {
    pub fn kind(self) -> ActuatorKind {
        match (self.has_actuator, self.has_amplitude_control) {
            (false, _) => ActuatorKind::Absent,
            (true, true) => ActuatorKind::WaveformCapable,
            (true, false) => ActuatorKind::BinaryOnly,
        }
    }
}

impl ActuatorKind {
    /// Parse from a config value. Trims whitespace, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waveform" => Some(ActuatorKind::WaveformCapable),
            "binary" => Some(ActuatorKind::BinaryOnly),
            "absent" | "none" => Some(ActuatorKind::Absent),
            _ => None,
        }
    }

    pub fn facts(self) -> CapabilityFacts {
        match self {
            ActuatorKind::WaveformCapable => CapabilityFacts {
                has_actuator: true,
                has_amplitude_control: true,
            },
            ActuatorKind::BinaryOnly => CapabilityFacts {
                has_actuator: true,
                has_amplitude_control: false,
            },
            ActuatorKind::Absent => CapabilityFacts::default(),
        }
    }
}

impl std::fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActuatorKind::WaveformCapable => f.write_str("waveform"),
            ActuatorKind::BinaryOnly => f.write_str("binary"),
            ActuatorKind::Absent => f.write_str("absent"),
        }
    }
}
