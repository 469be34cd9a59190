//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.

use petcare::app::events::AppEvent;
use petcare::app::ports::{ActuatorPort, ClockPort, EventSink, OutputReadback, SensorPort};
use petcare::sensors::SensorSnapshot;
use petcare::status::StatusReport;
use petcare::time::Timestamp;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Servo(u8),
    Pump(bool),
    Pump2(bool),
    Led(bool),
    Lamp(bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub sensors: SensorSnapshot,
    levels: OutputReadback,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            sensors: SensorSnapshot {
                water_level_percent: 50.0,
                temperature_c: 21.5,
                humidity_percent: 40.0,
                light_percent: 60.0,
            },
            levels: OutputReadback::default(),
        }
    }

    pub fn set_water_level(&mut self, percent: f32) {
        self.sensors.water_level_percent = percent;
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn levels(&self) -> OutputReadback {
        self.levels
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_feeder_servo(&mut self, degrees: u8) {
        self.calls.push(ActuatorCall::Servo(degrees));
        self.levels.servo_degrees = degrees;
    }

    fn set_primary_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Pump(on));
        self.levels.pump = on;
    }

    fn set_backup_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Pump2(on));
        self.levels.pump2 = on;
    }

    fn set_led(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Led(on));
        self.levels.led = on;
    }

    fn set_lamp(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Lamp(on));
        self.levels.lamp = on;
    }

    fn readback(&self) -> OutputReadback {
        self.levels
    }
}

// ── SensorPort for MockHardware ──────────────────────────────

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.sensors
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    pub now: Timestamp,
    pub adjustments: usize,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(s: &str) -> Self {
        Self {
            now: Timestamp::parse(s).expect("valid test timestamp"),
            adjustments: 0,
        }
    }

    /// Jump to a wall-clock time on the same day.
    pub fn set_hm(&mut self, hour: u8, minute: u8) {
        self.now.hour = hour;
        self.now.minute = minute;
        self.now.second = 0;
    }
}

impl ClockPort for MockClock {
    fn now(&self) -> Timestamp {
        self.now
    }

    fn adjust(&mut self, ts: Timestamp) {
        self.now = ts;
        self.adjustments += 1;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that records everything emitted by the service.
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Status reports in emission order.
    pub fn statuses(&self) -> Vec<StatusReport> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Status(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// Transition tags (`START-FEEDING-AUTO`, ...) in emission order.
    pub fn transitions(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Transition { transition, .. } => Some(transition.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
