/// TOML configuration with sensible defaults.
/// No config file is required to run — defaults work out of the box.

use crate::capability::ActuatorKind;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub host: HostConfig,
}

/// Simulated actuator the host binary drives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// "waveform" (amplitude control), "binary" (on/off only) or "absent"
    pub kind: String,
}

/// Command host behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Log every incoming call at info level
    pub log_requests: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { kind: "waveform".into() }
    }
}

impl DeviceConfig {
    /// Parsed actuator kind. Unknown values fall back to a waveform device.
    pub fn actuator_kind(&self) -> ActuatorKind {
        ActuatorKind::parse(&self.kind).unwrap_or_else(|| {
            log::warn!("Unknown device kind {:?}, using waveform", self.kind);
            ActuatorKind::WaveformCapable
        })
    }
}

impl Config {
    /// Load config from the default config file path, or return defaults if not found.
    pub fn load() -> Self {
        let config_path = config_file_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {config_path}");
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {config_path}: {e}. Using defaults.");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file found at {config_path}. Using defaults.");
                Self::default()
            }
        }
    }
}

fn config_file_path() -> String {
    std::env::var("HAPTICD_CONFIG").unwrap_or_else(|_| "hapticd.toml".into())
}
