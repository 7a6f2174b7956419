use hapticd::actuator::SimulatedActuator;
use hapticd::capability::ActuatorKind;
use hapticd::command::{MethodCall, Reply};
use hapticd::config;
use hapticd::engine::HapticEngine;

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Command host: one JSON method call per stdin line, one JSON reply per
/// stdout line. EOF shuts the engine down.
///
///   {"method": "preset", "args": {"type": "success"}}
///   {"status": "success", "result": null}
///
/// `setDevice {kind}` is handled here, not by the engine: it swaps the
/// simulated hardware to exercise capability changes between calls.
#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("hapticd v{} starting...", env!("CARGO_PKG_VERSION"));

    let cfg = config::Config::load();
    let actuator = Arc::new(SimulatedActuator::new(cfg.device.actuator_kind()));
    log::info!("Device: {}", actuator.kind());

    let mut engine = match HapticEngine::init(actuator.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Failed to initialise haptic engine: {e}");
            std::process::exit(1);
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("stdin read failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<MethodCall>(&line) {
            Ok(call) => {
                if cfg.host.log_requests {
                    log::info!("Call: {} {}", call.method, serde_json::Value::Object(call.args.clone()));
                }
                if call.method == "setDevice" {
                    set_device(&actuator, &call)
                } else {
                    engine.handle(&call)
                }
            }
            Err(e) => {
                log::warn!("Malformed request: {e}");
                Reply::Error { code: "INVALID_ARGS".into(), message: e.to_string() }
            }
        };

        if let Err(e) = write_reply(&mut stdout, &reply).await {
            log::error!("stdout write failed: {e}");
            break;
        }
    }

    engine.shutdown();
}

/// Write one reply line and flush it. Any failure means the host is gone.
async fn write_reply<W: AsyncWrite + Unpin>(out: &mut W, reply: &Reply) -> std::io::Result<()> {
    let mut line = serde_json::to_string(reply)?;
    line.push('\n');
    out.write_all(line.as_bytes()).await?;
    out.flush().await
}

fn set_device(actuator: &SimulatedActuator, call: &MethodCall) -> Reply {
    match call.args.get("kind").and_then(|v| v.as_str()).and_then(ActuatorKind::parse) {
        Some(kind) => {
            actuator.set_kind(kind);
            Reply::ok()
        }
        None => Reply::Error {
            code: "INVALID_ARGS".into(),
            message: "kind must be one of waveform, binary, absent".into(),
        },
    }
}
