//! Controller state: actuator flags, category lockouts, and the context
//! object that owns them.
//!
//! [`ControlContext`] is the single "blackboard" the tick loop owns.  The
//! command processor and the reconciliation engine both receive it by
//! `&mut`; there is no global state anywhere in the crate.
//!
//! ```text
//!  ┌──────────────────────────── ControlContext ────────────────────────────┐
//!  │ schedule:      ScheduleStore (programs + lamp window)                  │
//!  │ feeder:        { active, manual_override }                             │
//!  │ primary_pump:  { active, manual_override }                             │
//!  │ lamp:          { active, manual_override }                             │
//!  │ backup_pump:   active            (sensor rule only, no override)       │
//!  │ lockouts:      { feed_programs_enabled, water_programs_enabled }       │
//!  └────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod reconcile;

use core::fmt;

use heapless::Vec;
use log::info;

use crate::schedule::{Category, FeedingProgram, LampSchedule, ProgramsReplaced, ScheduleStore};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Every switched output the core decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actuator {
    /// Food dispenser servo.
    Feeder,
    /// Schedule/manual water pump.
    PrimaryPump,
    /// Reservoir top-up pump, driven by the water-level rule only.
    BackupPump,
    /// Grow-lamp relay.
    Lamp,
}

impl Actuator {
    /// Protocol/diagnostic label (`START_<LABEL>`, `[LOG][START-<LABEL>-AUTO]`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Feeder => "FEEDING",
            Self::PrimaryPump => "WATER",
            Self::BackupPump => "WATER2",
            Self::Lamp => "LAMP",
        }
    }

    /// The actuator a program category drives.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Food => Self::Feeder,
            Category::Water => Self::PrimaryPump,
        }
    }
}

/// Commanded output plus the manual-session marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorState {
    pub active: bool,
    /// The last switch-on was operator-initiated; schedules may not end it.
    pub manual_override: bool,
}

/// Per-category circuit breaker tripped by `STOP_<CATEGORY>_IMMEDIATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutFlags {
    pub feed_programs_enabled: bool,
    pub water_programs_enabled: bool,
}

impl Default for LockoutFlags {
    fn default() -> Self {
        Self {
            feed_programs_enabled: true,
            water_programs_enabled: true,
        }
    }
}

impl LockoutFlags {
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Food => self.feed_programs_enabled,
            Category::Water => self.water_programs_enabled,
        }
    }

    /// Suppress schedule-driven starts for `category`.
    pub fn trip(&mut self, category: Category) {
        self.set(category, false);
    }

    /// Allow schedule-driven starts for `category` again.
    pub fn rearm(&mut self, category: Category) {
        self.set(category, true);
    }

    fn set(&mut self, category: Category, enabled: bool) {
        match category {
            Category::Food => self.feed_programs_enabled = enabled,
            Category::Water => self.water_programs_enabled = enabled,
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// What caused an output to switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// A program or lamp window opened or closed.
    Schedule,
    /// `START_*` / `STOP_*`.
    Manual,
    /// `STOP_*_IMMEDIATE`.
    Immediate,
    /// A new program upload reset the output.
    Reprogram,
    /// Backup pump threshold rule.
    WaterLevel,
}

impl Cause {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Schedule | Self::WaterLevel => "AUTO",
            Self::Manual => "MANUAL",
            Self::Immediate => "IMMEDIATE",
            Self::Reprogram => "REPROGRAM",
        }
    }
}

/// A single output change that must be pushed to hardware and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub actuator: Actuator,
    pub active: bool,
    pub cause: Cause,
}

impl fmt::Display for Transition {
    /// `START-FEEDING-AUTO`, `STOP-WATER-IMMEDIATE`, ...
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.active { "START" } else { "STOP" };
        write!(f, "{}-{}-{}", verb, self.actuator.label(), self.cause.tag())
    }
}

/// Fixed-capacity transition list; at most one per actuator.
pub type Transitions = Vec<Transition, 4>;

// ---------------------------------------------------------------------------
// ControlContext
// ---------------------------------------------------------------------------

/// All mutable controller state, owned by the tick loop.
#[derive(Debug, Clone, Default)]
pub struct ControlContext {
    pub schedule: ScheduleStore,
    pub feeder: ActuatorState,
    pub primary_pump: ActuatorState,
    pub lamp: ActuatorState,
    pub backup_pump_active: bool,
    pub lockouts: LockoutFlags,
}

impl ControlContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one actuator.  The backup pump never carries an override.
    pub fn state(&self, actuator: Actuator) -> ActuatorState {
        match actuator {
            Actuator::Feeder => self.feeder,
            Actuator::PrimaryPump => self.primary_pump,
            Actuator::Lamp => self.lamp,
            Actuator::BackupPump => ActuatorState {
                active: self.backup_pump_active,
                manual_override: false,
            },
        }
    }

    /// Mutable state for the operator-controllable actuators.
    pub fn state_mut(&mut self, actuator: Actuator) -> Option<&mut ActuatorState> {
        match actuator {
            Actuator::Feeder => Some(&mut self.feeder),
            Actuator::PrimaryPump => Some(&mut self.primary_pump),
            Actuator::Lamp => Some(&mut self.lamp),
            Actuator::BackupPump => None,
        }
    }

    /// The status LED mirrors "feeding or watering in progress".
    pub fn led_on(&self) -> bool {
        self.feeder.active || self.primary_pump.active
    }

    // ── Command-side mutations ────────────────────────────────

    /// `START_<ACTUATOR>`: on, with the manual marker set.
    pub fn manual_start(&mut self, actuator: Actuator) -> Option<Transition> {
        let state = self.state_mut(actuator)?;
        *state = ActuatorState {
            active: true,
            manual_override: true,
        };
        Some(Transition {
            actuator,
            active: true,
            cause: Cause::Manual,
        })
    }

    /// `STOP_<ACTUATOR>`: off, manual marker cleared.
    pub fn manual_stop(&mut self, actuator: Actuator) -> Option<Transition> {
        let state = self.state_mut(actuator)?;
        *state = ActuatorState::default();
        Some(Transition {
            actuator,
            active: false,
            cause: Cause::Manual,
        })
    }

    /// `STOP_<CATEGORY>_IMMEDIATE`: off, and trip the category lockout.
    pub fn immediate_stop(&mut self, category: Category) -> Transition {
        let actuator = Actuator::for_category(category);
        if let Some(state) = self.state_mut(actuator) {
            *state = ActuatorState::default();
        }
        self.lockouts.trip(category);
        info!("Lockout: {} programs suspended", category.as_str());
        Transition {
            actuator,
            active: false,
            cause: Cause::Immediate,
        }
    }

    /// `SET_PROGRAMS`: swap the program table, reset the feeder and primary
    /// pump to a clean automatic state, and re-arm every uploaded category.
    ///
    /// Returns the upload outcome and a stop transition for each output that
    /// was on before the reset.
    pub fn replace_programs<I>(&mut self, programs: I) -> (ProgramsReplaced, Transitions)
    where
        I: IntoIterator<Item = FeedingProgram>,
    {
        let outcome = self.schedule.replace_programs(programs);

        let mut stopped = Transitions::new();
        for actuator in [Actuator::Feeder, Actuator::PrimaryPump] {
            let Some(state) = self.state_mut(actuator) else {
                continue;
            };
            let was_active = state.active;
            *state = ActuatorState::default();
            if was_active {
                // Capacity is 4; at most two entries are pushed here.
                let _ = stopped.push(Transition {
                    actuator,
                    active: false,
                    cause: Cause::Reprogram,
                });
            }
        }

        for category in [Category::Food, Category::Water] {
            if outcome.categories.contains(category) {
                self.lockouts.rearm(category);
            }
        }

        (outcome, stopped)
    }

    /// `SET_LAMP_SCHEDULE`: swap the lamp window.  Lamp state is untouched;
    /// the next reconciliation pass applies the new window.
    pub fn replace_lamp_schedule(&mut self, window: LampSchedule) {
        self.schedule.replace_lamp_schedule(window);
    }
}
