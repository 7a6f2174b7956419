//! Capability-aware haptic feedback engine.
//!
//! Turns presets, single pulses and multi-event patterns into actuation
//! commands for either an amplitude-capable motor (one native waveform) or
//! an on/off motor (timing emulated with cancellable waits).

pub mod actuator;
pub mod cancel;
pub mod capability;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod intensity;
pub mod pattern;
pub mod preset;
pub mod scheduler;
pub mod session;

pub use actuator::{Actuator, SimulatedActuator};
pub use capability::{ActuatorKind, CapabilityFacts};
pub use command::{Command, MethodCall, Reply};
pub use engine::HapticEngine;
pub use error::{ActuatorError, CommandError, EngineError};
pub use pattern::{HapticEvent, Pattern};
pub use preset::{Preset, PresetSpec};
pub use session::{SessionId, SessionState, SessionStatus};
