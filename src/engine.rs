/// Haptic engine: the object a host constructs once, feeds commands into,
/// and tears down with `shutdown()`.
///
/// Flow per request: preset expansion → pattern → session controller
/// (cancels the previous session) → scheduler. Capability facts are read
/// fresh from the actuator on every request.

use crate::actuator::Actuator;
use crate::capability::CapabilityFacts;
use crate::command::{Command, MethodCall, Reply};
use crate::error::{CommandError, EngineError};
use crate::pattern::{HapticEvent, Pattern};
use crate::preset;
use crate::session::{SessionController, SessionId, SessionStatus};
use serde_json::Value;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

pub struct HapticEngine {
    sessions: SessionController,
}

impl HapticEngine {
    /// Create the engine inside the current tokio runtime.
    pub fn init(actuator: Arc<dyn Actuator>) -> Result<Self, EngineError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(actuator, runtime))
    }

    pub fn with_runtime(actuator: Arc<dyn Actuator>, runtime: Handle) -> Self {
        let caps = actuator.capabilities();
        log::info!(
            "Haptic engine ready (actuator: {}, amplitude control: {})",
            caps.has_actuator,
            caps.has_amplitude_control
        );
        Self { sessions: SessionController::new(actuator, runtime) }
    }

    /// Cancel whatever is playing and release the engine.
    pub fn shutdown(mut self) {
        self.sessions.cancel();
        log::info!("Haptic engine shut down");
    }

    pub fn capabilities(&self) -> CapabilityFacts {
        self.sessions.actuator().capabilities()
    }

    pub fn is_supported(&self) -> bool {
        self.capabilities().has_actuator
    }

    pub fn supports_intensity(&self) -> bool {
        self.capabilities().has_amplitude_control
    }

    pub fn status(&self) -> SessionStatus {
        self.sessions.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.sessions.subscribe()
    }

    pub fn preset(&mut self, name: &str, intensity: Option<f64>, duration_ms: Option<u64>) -> Option<SessionId> {
        let spec = preset::expand(name, intensity, duration_ms);
        log::debug!("Preset {name:?} → {spec:?}");
        self.sessions.start_session(spec.into_pattern())
    }

    pub fn vibrate(&mut self, intensity: f64, duration_ms: u64) -> Option<SessionId> {
        let spec = preset::PresetSpec::Pulse { intensity, duration_ms };
        self.sessions.start_session(spec.into_pattern())
    }

    pub fn play_pattern(&mut self, events: Vec<HapticEvent>) -> Option<SessionId> {
        self.sessions.start_session(Pattern::new(events))
    }

    pub fn cancel(&mut self) {
        self.sessions.cancel();
    }

    /// Execute one parsed command. Returns the success payload.
    /// `Command::Unknown` yields `None`, meaning "not implemented".
    pub fn execute(&mut self, command: Command) -> Option<Value> {
        match command {
            Command::Preset { name, intensity, duration_ms } => {
                self.preset(&name, intensity, duration_ms);
            }
            Command::Vibrate { intensity, duration_ms } => {
                self.vibrate(intensity, duration_ms);
            }
            Command::PlayPattern { events } => {
                self.play_pattern(events);
            }
            Command::Cancel => self.cancel(),
            Command::IsSupported => return Some(Value::Bool(self.is_supported())),
            Command::SupportsIntensity => return Some(Value::Bool(self.supports_intensity())),
            Command::Unknown(method) => {
                log::debug!("Method {method:?} not implemented");
                return None;
            }
        }
        Some(Value::Null)
    }

    /// Full boundary round trip: validate, execute, wrap the result.
    pub fn handle(&mut self, call: &MethodCall) -> Reply {
        match Command::parse(call) {
            Ok(command) => match self.execute(command) {
                Some(result) => Reply::Success { result },
                None => Reply::NotImplemented { method: call.method.clone() },
            },
            Err(e) => {
                log::debug!("Rejected {}: {e}", call.method);
                Reply::from(e)
            }
        }
    }

    /// Convenience for hosts that only need the success value.
    pub fn call(&mut self, call: &MethodCall) -> Result<Option<Value>, CommandError> {
        Command::parse(call).map(|command| self.execute(command))
    }
}
