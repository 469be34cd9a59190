//! GPIO / peripheral pin assignments for the PetCare controller board.
//!
//! Single source of truth: the device adapter references this module
//! rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Feeder servo signal (LEDC PWM).
pub const FEEDER_SERVO_GPIO: i32 = 4;
/// Primary pump relay.  Active LOW.
pub const PUMP_RELAY_GPIO: i32 = 5;
/// Backup (reservoir) pump relay.  Active LOW.
pub const PUMP2_RELAY_GPIO: i32 = 6;
/// Status LED.  Active HIGH.
pub const STATUS_LED_GPIO: i32 = 7;
/// Grow-lamp relay.  Active HIGH.
pub const LAMP_RELAY_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// Resistive water-level sensor.  ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const WATER_LEVEL_ADC_CHANNEL: u32 = 0;
/// LDR light sensor divider.  ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const LIGHT_ADC_CHANNEL: u32 = 1;

// ---------------------------------------------------------------------------
// Servo PWM
// ---------------------------------------------------------------------------

/// Hobby servos expect a 50 Hz frame.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// Pulse width at 0°.
pub const SERVO_MIN_PULSE_US: u32 = 500;
/// Pulse width at 180°.
pub const SERVO_MAX_PULSE_US: u32 = 2500;
/// One 50 Hz frame.
pub const SERVO_PERIOD_US: u32 = 20_000;
