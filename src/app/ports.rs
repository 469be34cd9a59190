//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, clock, event sinks, config storage)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::config::SystemConfig;
use crate::error::ConfigError;
use crate::sensors::SensorSnapshot;
use crate::time::Timestamp;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick and again for every
/// status report.
pub trait SensorPort {
    /// Read every sensor and return converted values.  Unavailable readings
    /// carry their sentinel (see [`crate::sensors`]).
    fn read_all(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Logical output levels as read back from the hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputReadback {
    pub led: bool,
    pub pump: bool,
    pub pump2: bool,
    pub servo_degrees: u8,
    pub lamp: bool,
}

/// Write-side port: the domain calls this to command actuators.
///
/// All levels are logical (`true` = energised); relay polarity is the
/// adapter's concern.
pub trait ActuatorPort {
    /// Move the feeder servo to `degrees` (0–180).
    fn set_feeder_servo(&mut self, degrees: u8);

    fn set_primary_pump(&mut self, on: bool);

    fn set_backup_pump(&mut self, on: bool);

    /// Status LED ("feeding or watering in progress").
    fn set_led(&mut self, on: bool);

    fn set_lamp(&mut self, on: bool);

    /// Current output levels.
    fn readback(&self) -> OutputReadback;

    /// Drive every output to its inactive level, servo to `closed_degrees`.
    fn all_off(&mut self, closed_degrees: u8) {
        self.set_primary_pump(false);
        self.set_backup_pump(false);
        self.set_led(false);
        self.set_lamp(false);
        self.set_feeder_servo(closed_degrees);
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: RTC ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock source.  Sampled once per tick.
pub trait ClockPort {
    fn now(&self) -> Timestamp;

    /// Set the clock.  `ts` has already been range-checked.
    fn adjust(&mut self, ts: Timestamp);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → serial / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go: status reports to
/// the command channel, everything else to the diagnostic log.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: config file → domain)
// ───────────────────────────────────────────────────────────────

/// Loads system configuration at boot.
///
/// Implementations MUST validate what they load; invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`SystemConfig::default()`] if nothing
    /// is stored.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}
