/// Command boundary: named method calls from the host application.
///
///   preset            { type, intensity?, duration? }  → null
///   vibrate           { intensity?, duration? }        → null
///   playPattern       { events: [{duration, intensity}] } → null
///   cancel            {}                               → null
///   isSupported       {}                               → bool
///   supportsIntensity {}                               → bool
///   anything else                                      → not implemented
///
/// Required fields are validated here, before any scheduling happens.
/// Optional fields with the wrong type fall back to their defaults, and so
/// do unusable fields inside individual events. Only a missing or non-list
/// `events`, or an entry that is not an object, rejects a `playPattern`.

use crate::error::CommandError;
use crate::pattern::{DEFAULT_DURATION_MS, DEFAULT_INTENSITY, HapticEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw call as it arrives from the transport: `{"method": ..., "args": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Preset { name: String, intensity: Option<f64>, duration_ms: Option<u64> },
    Vibrate { intensity: f64, duration_ms: u64 },
    PlayPattern { events: Vec<HapticEvent> },
    Cancel,
    IsSupported,
    SupportsIntensity,
    Unknown(String),
}

/// What goes back over the boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    Success { result: Value },
    Error { code: String, message: String },
    NotImplemented { method: String },
}

impl MethodCall {
    pub fn new(method: impl Into<String>, args: Value) -> Self {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { method: method.into(), args }
    }
}

impl Command {
    pub fn parse(call: &MethodCall) -> Result<Self, CommandError> {
        let args = &call.args;
        let cmd = match call.method.as_str() {
            "preset" => {
                let name = args
                    .get("type")
                    .and_then(Value::as_str)
                    .ok_or(CommandError::MissingArgument("type"))?;
                Command::Preset {
                    name: name.to_string(),
                    intensity: opt_f64(args, "intensity"),
                    duration_ms: opt_u64(args, "duration"),
                }
            }
            "vibrate" => Command::Vibrate {
                intensity: opt_f64(args, "intensity").unwrap_or(DEFAULT_INTENSITY),
                duration_ms: opt_u64(args, "duration").unwrap_or(DEFAULT_DURATION_MS),
            },
            "playPattern" => {
                let raw = match args.get("events") {
                    None | Some(Value::Null) => return Err(CommandError::MissingArgument("events")),
                    Some(raw) => raw,
                };
                let list = raw.as_array().ok_or_else(|| CommandError::InvalidArgument {
                    field: "events",
                    reason: "expected a list of events".into(),
                })?;
                let events = list
                    .iter()
                    .enumerate()
                    .map(|(i, event)| {
                        HapticEvent::from_value(event).ok_or_else(|| CommandError::InvalidArgument {
                            field: "events",
                            reason: format!("entry {i} is not an object"),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Command::PlayPattern { events }
            }
            "cancel" => Command::Cancel,
            "isSupported" => Command::IsSupported,
            "supportsIntensity" => Command::SupportsIntensity,
            other => Command::Unknown(other.to_string()),
        };
        Ok(cmd)
    }
}

fn opt_f64(args: &Map<String, Value>, key: &str) -> Option<f64> {
    args.get(key).and_then(Value::as_f64)
}

fn opt_u64(args: &Map<String, Value>, key: &str) -> Option<u64> {
    args.get(key).and_then(Value::as_u64)
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Success { result: Value::Null }
    }

    pub fn value(result: impl Into<Value>) -> Self {
        Reply::Success { result: result.into() }
    }
}

impl From<CommandError> for Reply {
    fn from(e: CommandError) -> Self {
        Reply::Error { code: e.code().to_string(), message: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(method: &str, args: Value) -> Result<Command, CommandError> {
        Command::parse(&MethodCall::new(method, args))
    }

    #[test]
    fn preset_requires_type() {
        assert_eq!(parse("preset", json!({})), Err(CommandError::MissingArgument("type")));
        assert_eq!(parse("preset", json!({"type": 3})), Err(CommandError::MissingArgument("type")));
    }

    #[test]
    fn preset_optional_fields() {
        assert_eq!(
            parse("preset", json!({"type": "short", "intensity": 0.9, "duration": 70})),
            Ok(Command::Preset { name: "short".into(), intensity: Some(0.9), duration_ms: Some(70) })
        );
        assert_eq!(
            parse("preset", json!({"type": "x", "intensity": "loud"})),
            Ok(Command::Preset { name: "x".into(), intensity: None, duration_ms: None })
        );
    }

    #[test]
    fn vibrate_applies_defaults() {
        assert_eq!(parse("vibrate", json!({})), Ok(Command::Vibrate { intensity: 0.5, duration_ms: 50 }));
        assert_eq!(
            parse("vibrate", json!({"intensity": 1, "duration": 120})),
            Ok(Command::Vibrate { intensity: 1.0, duration_ms: 120 })
        );
    }

    #[test]
    fn play_pattern_requires_events() {
        assert_eq!(parse("playPattern", json!({})), Err(CommandError::MissingArgument("events")));
        assert_eq!(
            parse("playPattern", json!({"events": null})),
            Err(CommandError::MissingArgument("events"))
        );
        let err = parse("playPattern", json!({"events": "buzz"})).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGS");
    }

    #[test]
    fn play_pattern_events() {
        let cmd = parse(
            "playPattern",
            json!({"events": [{"duration": 50, "intensity": 0.6}, {"duration": 50, "intensity": 0}]}),
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::PlayPattern { events: vec![HapticEvent::new(50, 0.6), HapticEvent::new(50, 0.0)] }
        );
        assert_eq!(parse("playPattern", json!({"events": []})), Ok(Command::PlayPattern { events: vec![] }));
    }

    #[test]
    fn play_pattern_defaults_unusable_event_fields() {
        let cmd = parse(
            "playPattern",
            json!({"events": [
                {"duration": 50, "intensity": null},
                {"duration": 50.0, "intensity": "loud"},
                {"duration": "soon", "intensity": 0.0},
            ]}),
        );
        assert_eq!(
            cmd,
            Ok(Command::PlayPattern {
                events: vec![
                    HapticEvent::new(50, 0.5),
                    HapticEvent::new(50, 0.5),
                    HapticEvent::new(50, 0.0),
                ]
            })
        );
    }

    #[test]
    fn play_pattern_rejects_non_object_entries() {
        let err = parse("playPattern", json!({"events": [{"duration": 50}, 7]})).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGS");
        assert_eq!(
            err,
            CommandError::InvalidArgument { field: "events", reason: "entry 1 is not an object".into() }
        );
    }

    #[test]
    fn simple_and_unknown_methods() {
        assert_eq!(parse("cancel", Value::Null), Ok(Command::Cancel));
        assert_eq!(parse("isSupported", json!({})), Ok(Command::IsSupported));
        assert_eq!(parse("supportsIntensity", json!({})), Ok(Command::SupportsIntensity));
        assert_eq!(parse("selfDestruct", json!({})), Ok(Command::Unknown("selfDestruct".into())));
    }

    #[test]
    fn method_call_from_json_line() {
        let call: MethodCall = serde_json::from_str(r#"{"method": "cancel"}"#).unwrap();
        assert_eq!(call.method, "cancel");
        assert!(call.args.is_empty());
    }

    #[test]
    fn reply_wire_format() {
        let err: Reply = CommandError::MissingArgument("type").into();
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "error", "code": "INVALID_ARGS", "message": "type is required"})
        );
        assert_eq!(
            serde_json::to_value(Reply::value(true)).unwrap(),
            json!({"status": "success", "result": true})
        );
        assert_eq!(
            serde_json::to_value(Reply::NotImplemented { method: "x".into() }).unwrap(),
            json!({"status": "not_implemented", "method": "x"})
        );
    }
}
