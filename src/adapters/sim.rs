//! In-memory peripherals for host runs and tests.
//!
//! | Type          | Stands in for                      |
//! |---------------|------------------------------------|
//! | `SimPin`      | GPIO output (`embedded-hal`)       |
//! | `SimServo`    | LEDC PWM channel (`embedded-hal`)  |
//! | `SimSensors`  | ADC sensors + DHT ([`SensorPort`]) |
//! | `SimHardware` | the whole board                    |
//! | `SimClock`    | RTC ([`ClockPort`])                |

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use super::hardware::{Board, GpioActuators, OutputPins};
use crate::app::ports::{ClockPort, SensorPort};
use crate::sensors::{self, SensorSnapshot};
use crate::time::Timestamp;

// ───────────────────────────────────────────────────────────────
// Pins
// ───────────────────────────────────────────────────────────────

/// A GPIO output that remembers its level.  Boots HIGH, like a pin with an
/// external pull-up, so active-low relays start released.
#[derive(Debug)]
pub struct SimPin {
    high: bool,
    fail: bool,
}

impl SimPin {
    pub fn new() -> Self {
        Self { high: true, fail: false }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Make subsequent writes fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail = fail;
    }

    fn write(&mut self, high: bool) -> Result<(), digital::ErrorKind> {
        if self.fail {
            return Err(digital::ErrorKind::Other);
        }
        self.high = high;
        Ok(())
    }
}

impl Default for SimPin {
    fn default() -> Self {
        Self::new()
    }
}

impl digital::ErrorType for SimPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

/// PWM channel with microsecond resolution over a 20 ms frame.
#[derive(Debug, Default)]
pub struct SimServo {
    duty: u16,
}

impl SimServo {
    pub const MAX_DUTY: u16 = 20_000;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl pwm::ErrorType for SimServo {
    type Error = pwm::ErrorKind;
}

impl SetDutyCycle for SimServo {
    fn max_duty_cycle(&self) -> u16 {
        Self::MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty.min(Self::MAX_DUTY);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Sensors
// ───────────────────────────────────────────────────────────────

/// Settable sensor source.  Raw setters go through the same conversions a
/// device adapter uses.
#[derive(Debug, Clone)]
pub struct SimSensors {
    snapshot: SensorSnapshot,
}

impl Default for SimSensors {
    /// A half-full reservoir on a mild day.
    fn default() -> Self {
        Self {
            snapshot: SensorSnapshot {
                water_level_percent: 50.0,
                temperature_c: 22.0,
                humidity_percent: 45.0,
                light_percent: 30.0,
            },
        }
    }
}

impl SimSensors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_water_level_percent(&mut self, percent: f32) {
        self.snapshot.water_level_percent = percent;
    }

    pub fn set_water_level_adc(&mut self, raw: u16) {
        self.snapshot.water_level_percent = sensors::water_level_from_adc(raw);
    }

    pub fn set_light_adc(&mut self, raw: u16) {
        self.snapshot.light_percent = sensors::light_from_adc(raw);
    }

    /// DHT reading; pass NaN to simulate a failed read.
    pub fn set_dht(&mut self, temperature_c: f32, humidity_percent: f32) {
        self.snapshot.temperature_c = sensors::dht_or_sentinel(temperature_c);
        self.snapshot.humidity_percent = sensors::dht_or_sentinel(humidity_percent);
    }
}

impl SensorPort for SimSensors {
    fn read_all(&mut self) -> SensorSnapshot {
        self.snapshot
    }
}

// ───────────────────────────────────────────────────────────────
// Board
// ───────────────────────────────────────────────────────────────

/// Simulated board: real [`GpioActuators`] over [`SimPin`]s plus
/// [`SimSensors`].
pub type SimHardware = Board<GpioActuators<SimPin, SimServo>, SimSensors>;

impl Default for SimHardware {
    fn default() -> Self {
        Board::new(
            GpioActuators::new(
                OutputPins {
                    pump: SimPin::new(),
                    pump2: SimPin::new(),
                    led: SimPin::new(),
                    lamp: SimPin::new(),
                },
                SimServo::new(),
            ),
            SimSensors::new(),
        )
    }
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// A clock that only moves when told to.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    now: Timestamp,
}

impl SimClock {
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }

    pub fn advance_secs(&mut self, secs: u64) {
        self.now = self.now.add_seconds(secs);
    }
}

impl ClockPort for SimClock {
    fn now(&self) -> Timestamp {
        self.now
    }

    fn adjust(&mut self, ts: Timestamp) {
        self.now = ts;
    }
}
