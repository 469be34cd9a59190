//! Hardware adapter: bridges output pins to the [`ActuatorPort`].
//!
//! [`GpioActuators`] is generic over `embedded-hal` 1.0 traits, so the same
//! code drives ESP-IDF `PinDriver`/`LedcDriver` on the device and the
//! in-memory pins from [`super::sim`] on the host.
//!
//! ```text
//!   ActuatorPort (logical on/off, degrees)
//!        │
//!   GpioActuators ── polarity ──▶ pump, pump2   (active LOW relays)
//!        │                    └─▶ led, lamp     (active HIGH)
//!        └── pulse width ───────▶ feeder servo  (50 Hz, 0.5–2.5 ms)
//! ```
//!
//! Write failures are logged and leave the readback at the last level the
//! pin actually accepted.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{ActuatorPort, OutputReadback, SensorPort};
use crate::pins::{SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US, SERVO_PERIOD_US};
use crate::sensors::SensorSnapshot;

/// Relay and LED outputs, all of one pin type.
pub struct OutputPins<P> {
    pub pump: P,
    pub pump2: P,
    pub led: P,
    pub lamp: P,
}

/// Concrete adapter that combines every output behind [`ActuatorPort`].
pub struct GpioActuators<P, S> {
    pins: OutputPins<P>,
    servo: S,
    levels: OutputReadback,
}

impl<P: OutputPin, S: SetDutyCycle> GpioActuators<P, S> {
    pub fn new(pins: OutputPins<P>, servo: S) -> Self {
        Self {
            pins,
            servo,
            levels: OutputReadback::default(),
        }
    }

    /// Raw pin access, for inspecting electrical levels.
    pub fn pins(&self) -> &OutputPins<P> {
        &self.pins
    }

    pub fn servo(&self) -> &S {
        &self.servo
    }
}

/// Set `pin` to the electrical level for logical `on`.
fn drive<P: OutputPin>(pin: &mut P, on: bool, active_low: bool, name: &str) -> bool {
    let high = on != active_low;
    let result = if high { pin.set_high() } else { pin.set_low() };
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("GPIO: {} write failed: {:?}", name, e);
            false
        }
    }
}

/// Duty value for `degrees` given the timer's full-scale duty.
pub fn servo_duty(max_duty: u16, degrees: u8) -> u16 {
    let span = SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US;
    let pulse_us = SERVO_MIN_PULSE_US + u32::from(degrees.min(180)) * span / 180;
    (u32::from(max_duty) * pulse_us / SERVO_PERIOD_US) as u16
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin, S: SetDutyCycle> ActuatorPort for GpioActuators<P, S> {
    fn set_feeder_servo(&mut self, degrees: u8) {
        let degrees = degrees.min(180);
        let duty = servo_duty(self.servo.max_duty_cycle(), degrees);
        match self.servo.set_duty_cycle(duty) {
            Ok(()) => self.levels.servo_degrees = degrees,
            Err(e) => warn!("PWM: servo write failed: {:?}", e),
        }
    }

    fn set_primary_pump(&mut self, on: bool) {
        if drive(&mut self.pins.pump, on, true, "pump") {
            self.levels.pump = on;
        }
    }

    fn set_backup_pump(&mut self, on: bool) {
        if drive(&mut self.pins.pump2, on, true, "pump2") {
            self.levels.pump2 = on;
        }
    }

    fn set_led(&mut self, on: bool) {
        if drive(&mut self.pins.led, on, false, "led") {
            self.levels.led = on;
        }
    }

    fn set_lamp(&mut self, on: bool) {
        if drive(&mut self.pins.lamp, on, false, "lamp") {
            self.levels.lamp = on;
        }
    }

    fn readback(&self) -> OutputReadback {
        self.levels
    }
}

// ───────────────────────────────────────────────────────────────
// Board
// ───────────────────────────────────────────────────────────────

/// Outputs and sensors joined into the single `SensorPort + ActuatorPort`
/// value the service takes per tick.
pub struct Board<A, S> {
    pub actuators: A,
    pub sensors: S,
}

impl<A, S> Board<A, S> {
    pub fn new(actuators: A, sensors: S) -> Self {
        Self { actuators, sensors }
    }
}

impl<A, S: SensorPort> SensorPort for Board<A, S> {
    fn read_all(&mut self) -> SensorSnapshot {
        self.sensors.read_all()
    }
}

impl<A: ActuatorPort, S> ActuatorPort for Board<A, S> {
    fn set_feeder_servo(&mut self, degrees: u8) {
        self.actuators.set_feeder_servo(degrees);
    }

    fn set_primary_pump(&mut self, on: bool) {
        self.actuators.set_primary_pump(on);
    }

    fn set_backup_pump(&mut self, on: bool) {
        self.actuators.set_backup_pump(on);
    }

    fn set_led(&mut self, on: bool) {
        self.actuators.set_led(on);
    }

    fn set_lamp(&mut self, on: bool) {
        self.actuators.set_lamp(on);
    }

    fn readback(&self) -> OutputReadback {
        self.actuators.readback()
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF wiring
// ───────────────────────────────────────────────────────────────

#[cfg(feature = "espidf")]
pub mod esp {
    //! Device construction: ESP-IDF drivers for outputs, oneshot ADC for
    //! the analog sensors.

    use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
    use esp_idf_hal::ledc::config::TimerConfig;
    use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::units::Hertz;
    use esp_idf_svc::sys::*;
    use log::{info, warn};

    use super::{Board, GpioActuators, OutputPins};
    use crate::app::ports::SensorPort;
    use crate::pins;
    use crate::sensors::{self, SensorSnapshot, UNAVAILABLE};

    pub type DeviceActuators = GpioActuators<PinDriver<'static, AnyOutputPin, Output>, LedcDriver<'static>>;
    pub type DeviceBoard = Board<DeviceActuators, AdcSensors>;

    /// Claim every peripheral the controller uses.
    pub fn board() -> anyhow::Result<DeviceBoard> {
        Ok(Board::new(actuators()?, AdcSensors::new()?))
    }

    fn output(gpio: i32) -> anyhow::Result<PinDriver<'static, AnyOutputPin, Output>> {
        // SAFETY: each GPIO number in `pins` is claimed exactly once, here.
        let pin = unsafe { AnyOutputPin::new(gpio) };
        Ok(PinDriver::output(pin)?)
    }

    /// Claim the output pins and the servo LEDC channel.
    pub fn actuators() -> anyhow::Result<DeviceActuators> {
        let p = Peripherals::take()?;
        let timer = LedcTimerDriver::new(
            p.ledc.timer0,
            &TimerConfig::default()
                .frequency(Hertz(pins::SERVO_PWM_FREQ_HZ))
                .resolution(Resolution::Bits14),
        )?;
        // SAFETY: servo GPIO is not claimed anywhere else.
        let servo_pin = unsafe { AnyOutputPin::new(pins::FEEDER_SERVO_GPIO) };
        let servo = LedcDriver::new(p.ledc.channel0, timer, servo_pin)?;

        let outputs = OutputPins {
            pump: output(pins::PUMP_RELAY_GPIO)?,
            pump2: output(pins::PUMP2_RELAY_GPIO)?,
            led: output(pins::STATUS_LED_GPIO)?,
            lamp: output(pins::LAMP_RELAY_GPIO)?,
        };
        info!("hw: outputs and servo PWM configured");
        Ok(GpioActuators::new(outputs, servo))
    }

    /// Water-level sensor and LDR on ADC1.  No DHT driver is wired, so
    /// temperature and humidity always report unavailable.
    pub struct AdcSensors {
        handle: adc_oneshot_unit_handle_t,
    }

    impl AdcSensors {
        pub fn new() -> anyhow::Result<Self> {
            let init_cfg = adc_oneshot_unit_init_cfg_t {
                unit_id: adc_unit_t_ADC_UNIT_1,
                ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..Default::default()
            };
            let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
            // SAFETY: called once at boot; `handle` is owned by the returned value.
            esp!(unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) })?;

            let chan_cfg = adc_oneshot_chan_cfg_t {
                atten: adc_atten_t_ADC_ATTEN_DB_12,
                bitwidth: adc_bitwidth_t_ADC_BITWIDTH_10,
            };
            for channel in [pins::WATER_LEVEL_ADC_CHANNEL, pins::LIGHT_ADC_CHANNEL] {
                // SAFETY: `handle` was initialised above.
                esp!(unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) })?;
            }
            info!("hw: ADC1 configured (CH{}=level, CH{}=light)", pins::WATER_LEVEL_ADC_CHANNEL, pins::LIGHT_ADC_CHANNEL);
            Ok(Self { handle })
        }

        fn read(&self, channel: u32) -> Option<u16> {
            let mut raw: i32 = 0;
            // SAFETY: single-threaded tick loop access to an initialised unit.
            let ret = unsafe { adc_oneshot_read(self.handle, channel, &mut raw) };
            if ret != ESP_OK as i32 {
                warn!("ADC: channel {} read failed (rc={})", channel, ret);
                return None;
            }
            Some(raw.max(0) as u16)
        }
    }

    impl SensorPort for AdcSensors {
        fn read_all(&mut self) -> SensorSnapshot {
            SensorSnapshot {
                water_level_percent: self.read(pins::WATER_LEVEL_ADC_CHANNEL).map_or(0.0, sensors::water_level_from_adc),
                temperature_c: UNAVAILABLE,
                humidity_percent: UNAVAILABLE,
                light_percent: self.read(pins::LIGHT_ADC_CHANNEL).map_or(0.0, sensors::light_from_adc),
            }
        }
    }
}
