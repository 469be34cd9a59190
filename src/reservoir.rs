//! Reservoir guard: the backup pump's water-level rule.
//!
//! The backup pump ignores schedules, overrides, and lockouts entirely.  It
//! is on exactly while the reservoir reads below the threshold:
//!
//! ```text
//!   level <  threshold  and pump off  →  start
//!   level >= threshold  and pump on   →  stop
//! ```
//!
//! ## No hysteresis
//!
//! A level sitting on the threshold toggles the pump every tick.  The
//! threshold itself counts as "sufficient".  A disconnected sensor reports
//! 0 % and therefore keeps the pump running; a NaN reading matches neither
//! arm and leaves the pump as it was.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::reconcile::Step;

pub struct ReservoirGuard {
    threshold_percent: f32,
}

impl ReservoirGuard {
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_threshold(config.backup_pump_threshold_percent)
    }

    pub fn with_threshold(threshold_percent: f32) -> Self {
        Self { threshold_percent }
    }

    /// Decide the backup pump's next step for the given reservoir level.
    pub fn evaluate(&self, pump_active: bool, level_percent: f32) -> Option<Step> {
        if level_percent < self.threshold_percent && !pump_active {
            warn!(
                "Reservoir: level {:.1}% < {:.1}%, starting backup pump",
                level_percent, self.threshold_percent
            );
            Some(Step::Start)
        } else if level_percent >= self.threshold_percent && pump_active {
            info!(
                "Reservoir: level {:.1}% >= {:.1}%, stopping backup pump",
                level_percent, self.threshold_percent
            );
            Some(Step::Stop)
        } else {
            None
        }
    }
}
