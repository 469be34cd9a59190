//! System configuration parameters
//!
//! All tunable parameters for the PetCare controller.  Every field has a
//! default, so a config file only needs the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Timing ---
    /// Fixed delay between control ticks (milliseconds)
    pub tick_interval_ms: u32,
    /// Diagnostic heartbeat period (milliseconds)
    pub heartbeat_interval_ms: u32,

    // --- Reservoir ---
    /// Water level (0-100%) below which the backup pump runs
    pub backup_pump_threshold_percent: f32,

    // --- Feeder servo ---
    /// Servo angle while dispensing (degrees)
    pub feeder_open_degrees: u8,
    /// Servo angle at rest (degrees)
    pub feeder_closed_degrees: u8,

    // --- Protocol ---
    /// Longest accepted instruction line (bytes)
    pub max_line_len: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 50,        // 20 Hz
            heartbeat_interval_ms: 5000, // 1 / 5 s

            // Reservoir
            backup_pump_threshold_percent: 10.0,

            // Feeder servo
            feeder_open_degrees: 90,
            feeder_closed_degrees: 0,

            // Protocol
            max_line_len: 1024,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if !(0.0..=100.0).contains(&self.backup_pump_threshold_percent) {
            return Err(ConfigError::ValidationFailed(
                "backup_pump_threshold_percent must be within 0-100",
            ));
        }
        if self.feeder_open_degrees > 180 || self.feeder_closed_degrees > 180 {
            return Err(ConfigError::ValidationFailed("servo angles must be <= 180"));
        }
        if self.max_line_len == 0 {
            return Err(ConfigError::ValidationFailed("max_line_len must be > 0"));
        }
        Ok(())
    }

    /// Decode and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Heartbeat period expressed in ticks (at least one).
    pub fn heartbeat_ticks(&self) -> u64 {
        u64::from((self.heartbeat_interval_ms / self.tick_interval_ms.max(1)).max(1))
    }
}
