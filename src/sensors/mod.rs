//! Sensor snapshot and raw-reading conversions.
//!
//! The core never touches an ADC or a DHT bus itself.  A [`SensorPort`]
//! adapter hands it one [`SensorSnapshot`] per tick, already converted to
//! engineering units by the helpers below:
//!
//! ```text
//!   water-level sensor ADC ──▶ water_level_from_adc ──▶ waterLevel  (%; 0 = disconnected)
//!   LDR ADC              ──▶ light_from_adc       ──▶ lightLevel  (%)
//!   DHT temp / humidity  ──▶ dht_or_sentinel      ──▶ -1 when unavailable
//! ```
//!
//! Sentinels are valid inputs downstream: a disconnected level sensor reads
//! 0 % and so keeps the backup pump on.
//!
//! [`SensorPort`]: crate::app::ports::SensorPort

/// Full-scale reading of the 10-bit ADC.
pub const ADC_MAX: u16 = 1023;

/// Raw sensor value at an empty reservoir.
const LEVEL_RAW_EMPTY: u16 = 900;
/// Raw sensor value at a full reservoir.
const LEVEL_RAW_FULL: u16 = 100;
/// Below this the sensor is considered unplugged.
const LEVEL_RAW_DISCONNECTED: u16 = 50;

/// Reported for temperature/humidity when the DHT read fails.
pub const UNAVAILABLE: f32 = -1.0;

/// Converted readings for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    pub water_level_percent: f32,
    pub temperature_c: f32,
    pub humidity_percent: f32,
    pub light_percent: f32,
}

impl Default for SensorSnapshot {
    /// Everything unavailable; the level sensor reads as disconnected.
    fn default() -> Self {
        Self {
            water_level_percent: 0.0,
            temperature_c: UNAVAILABLE,
            humidity_percent: UNAVAILABLE,
            light_percent: 0.0,
        }
    }
}

/// Resistive level sensor: 900 = empty, 100 = full, linear in between.
///
/// Readings outside the plausible band (`< 50` or `> 1023`) mean the sensor
/// is unplugged and map to 0 %.
pub fn water_level_from_adc(raw: u16) -> f32 {
    if !(LEVEL_RAW_DISCONNECTED..=ADC_MAX).contains(&raw) {
        return 0.0;
    }
    let raw = raw.clamp(LEVEL_RAW_FULL, LEVEL_RAW_EMPTY);
    f32::from(LEVEL_RAW_EMPTY - raw) / f32::from(LEVEL_RAW_EMPTY - LEVEL_RAW_FULL) * 100.0
}

/// Photoresistor divider, linear over the ADC range.
pub fn light_from_adc(raw: u16) -> f32 {
    f32::from(raw.min(ADC_MAX)) / f32::from(ADC_MAX) * 100.0
}

/// DHT drivers report a failed read as NaN.
pub fn dht_or_sentinel(value: f32) -> f32 {
    if value.is_nan() { UNAVAILABLE } else { value }
}
