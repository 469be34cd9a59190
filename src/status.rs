//! Status reporter.
//!
//! Builds the status object the host application consumes, one JSON object
//! per line:
//!
//! ```text
//! {"feedingActive":false,"waterActive":true,"water2Active":false,"ledState":true,
//!  "pumpState":true,"pump2State":false,"servoPosition":0,"lampState":false,
//!  "waterLevel":62.5,"temperature":21.3,"humidity":48.0,"lightLevel":12.2}
//! ```
//!
//! `*Active` fields are the controller's commanded state; `*State` fields
//! and `servoPosition` are read back from the outputs at the moment of the
//! call.  Nothing is cached between reports.

use serde::Serialize;

use crate::app::ports::OutputReadback;
use crate::control::ControlContext;
use crate::sensors::SensorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub feeding_active: bool,
    pub water_active: bool,
    pub water2_active: bool,
    pub led_state: bool,
    pub pump_state: bool,
    pub pump2_state: bool,
    pub servo_position: u8,
    pub lamp_state: bool,
    pub water_level: f32,
    pub temperature: f32,
    pub humidity: f32,
    pub light_level: f32,
}

impl StatusReport {
    pub fn capture(ctx: &ControlContext, outputs: OutputReadback, sensors: SensorSnapshot) -> Self {
        Self {
            feeding_active: ctx.feeder.active,
            water_active: ctx.primary_pump.active,
            water2_active: ctx.backup_pump_active,
            led_state: outputs.led,
            pump_state: outputs.pump,
            pump2_state: outputs.pump2,
            servo_position: outputs.servo_degrees,
            lamp_state: outputs.lamp,
            water_level: sensors.water_level_percent,
            temperature: sensors.temperature_c,
            humidity: sensors.humidity_percent,
            light_level: sensors.light_percent,
        }
    }

    /// Serialise to a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> String {
        // Infallible for this shape; non-finite floats encode as `null`.
        serde_json::to_string(self).unwrap_or_default()
    }
}
