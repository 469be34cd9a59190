//! Diagnostic channel.
//!
//! Two pieces:
//!
//! - [`init_host_logger`], which installs `env_logger` as the `log`
//!   backend on host builds with a `[LEVEL][target] message` layout.  On
//!   the device `esp_idf_logger` plays this role.
//! - [`LogEventSink`], an [`EventSink`] that renders every application
//!   event as a diagnostic line.  Transitions get the full context line:
//!
//! ```text
//! [LOG][START-FEEDING-AUTO] Feeding: ON, Water: OFF, Water2: OFF, LED: ON, Pump: OFF,
//!   Pump2: OFF, Servo: 90, Lamp: OFF, Water Level: 62.5%, Temp: 21.3C, Humidity: 48.0%, Light: 12.2%
//! ```

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::Transition;
use crate::status::StatusReport;

// ───────────────────────────────────────────────────────────────
// log backend
// ───────────────────────────────────────────────────────────────

/// Install `env_logger` on stderr with `level` as the starting level.
/// Fails if a logger is already set.
#[cfg(not(feature = "espidf"))]
pub fn init_host_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    use std::io::Write;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .format(|buf, record| writeln!(buf, "[{}][{}] {}", record.level(), record.target(), record.args()))
        .try_init()?;
    // The backend passes everything; the global max level is the only
    // filter, so `DEBUG_ON` can raise it at run time.
    log::set_max_level(level);
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Event sink
// ───────────────────────────────────────────────────────────────

fn on_off(v: bool) -> &'static str {
    if v { "ON" } else { "OFF" }
}

/// Render the diagnostic context line for a transition.
pub fn context_line(transition: &Transition, s: &StatusReport) -> String {
    format!(
        "[LOG][{}] Feeding: {}, Water: {}, Water2: {}, LED: {}, Pump: {}, Pump2: {}, Servo: {}, \
         Lamp: {}, Water Level: {:.1}%, Temp: {:.1}C, Humidity: {:.1}%, Light: {:.1}%",
        transition,
        on_off(s.feeding_active),
        on_off(s.water_active),
        on_off(s.water2_active),
        on_off(s.led_state),
        on_off(s.pump_state),
        on_off(s.pump2_state),
        s.servo_position,
        on_off(s.lamp_state),
        s.water_level,
        s.temperature,
        s.humidity,
        s.light_level,
    )
}

/// Adapter that logs every [`AppEvent`] to the diagnostic channel.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | all outputs off"),
            AppEvent::Status(s) => debug!("STATUS | {}", s.to_json_line()),
            AppEvent::Transition { transition, status } => info!("{}", context_line(transition, status)),
            AppEvent::ProgramsReplaced(r) => {
                info!(
                    "PROGRAMS | {} accepted, {} dropped (food={}, water={})",
                    r.accepted, r.dropped, r.categories.food, r.categories.water
                );
            }
            AppEvent::LampScheduleReplaced(w) => {
                info!("LAMP | {}-{} enabled={}", w.start, w.end, w.enabled);
            }
            AppEvent::ClockAdjusted(ts) => info!("[SET_TIME] RTC updated to {}", ts),
            AppEvent::ClockRejected(e) => warn!("[SET_TIME] rejected: {}", e),
            AppEvent::CommandRejected(e) => warn!("[COMMAND] {}", e),
            AppEvent::DebugEnabled => info!("[DEBUG] Detailed logging enabled"),
            AppEvent::Heartbeat { now, programs } => {
                info!("[HEARTBEAT] Time: {}, Programs: {}", now, programs);
            }
        }
    }
}
