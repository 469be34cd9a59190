//! Reconciliation engine.
//!
//! Once per tick the engine folds three authorities into one output state:
//!
//! ```text
//!   programs ──┐
//!   lockouts ──┼─▶ desired ─┐
//!   clock    ──┘            ├─▶ step(state, desired) ─▶ Transition
//!   manual override ────────┘
//!
//!   water level ──▶ ReservoirGuard ──▶ backup pump Transition
//! ```
//!
//! | desired | active | override | result                         |
//! |---------|--------|----------|--------------------------------|
//! | true    | false  | any      | start, override cleared        |
//! | false   | true   | false    | stop                           |
//! | false   | true   | true     | hold (manual session survives) |
//! | other   |        |          | no change                      |

use log::debug;

use super::{Actuator, ActuatorState, Cause, ControlContext, LockoutFlags, Transition, Transitions};
use crate::reservoir::ReservoirGuard;
use crate::schedule::{Category, FeedingProgram};
use crate::time::TimeOfDay;

/// Direction of a single output change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Start,
    Stop,
}

/// The schedule transition rule for one override-capable actuator.
pub fn step(state: ActuatorState, desired: bool) -> Option<Step> {
    match (desired, state.active, state.manual_override) {
        (true, false, _) => Some(Step::Start),
        (false, true, false) => Some(Step::Stop),
        _ => None,
    }
}

/// Logical OR over every enabled, in-window program of `category`, gated by
/// the category lockout.
pub fn category_desired(
    programs: &[FeedingProgram],
    lockouts: &LockoutFlags,
    category: Category,
    now: TimeOfDay,
) -> bool {
    lockouts.is_enabled(category)
        && programs
            .iter()
            .any(|p| p.category == category && p.window.enabled_at(now))
}

/// Per-tick evaluator.  Stateless apart from the reservoir threshold; all
/// mutable state lives in the [`ControlContext`] passed to [`run`](Self::run).
pub struct Reconciler {
    reservoir: ReservoirGuard,
}

impl Reconciler {
    pub fn new(reservoir: ReservoirGuard) -> Self {
        Self { reservoir }
    }

    /// Evaluate the sensor rule and all schedules against `now`, update
    /// `ctx`, and return the transitions that hardware must follow.
    pub fn run(&self, ctx: &mut ControlContext, now: TimeOfDay, water_level_percent: f32) -> Transitions {
        let mut out = Transitions::new();

        // 1. Sensor-driven backup pump.
        if let Some(step) = self.reservoir.evaluate(ctx.backup_pump_active, water_level_percent) {
            ctx.backup_pump_active = step == Step::Start;
            push(&mut out, Actuator::BackupPump, step, Cause::WaterLevel);
        }

        // 2. Program categories.
        for category in [Category::Food, Category::Water] {
            let desired = category_desired(ctx.schedule.programs(), &ctx.lockouts, category, now);
            let actuator = Actuator::for_category(category);
            if let Some(state) = ctx.state_mut(actuator) {
                apply(state, actuator, desired, &mut out);
            }
        }

        // 3. Lamp window, independent of programs and lockouts.
        // A disabled schedule reads as "off" and ends an automatic session
        // rather than freezing the lamp in whatever state it was left.
        let lamp_desired = ctx.schedule.lamp_schedule().enabled_at(now);
        apply(&mut ctx.lamp, Actuator::Lamp, lamp_desired, &mut out);

        if !out.is_empty() {
            debug!("Reconcile @ {}: {} transition(s)", now, out.len());
        }
        out
    }
}

fn apply(state: &mut ActuatorState, actuator: Actuator, desired: bool, out: &mut Transitions) {
    match step(*state, desired) {
        Some(Step::Start) => {
            // An automatic start supersedes a stale override flag.
            *state = ActuatorState {
                active: true,
                manual_override: false,
            };
            push(out, actuator, Step::Start, Cause::Schedule);
        }
        Some(Step::Stop) => {
            state.active = false;
            push(out, actuator, Step::Stop, Cause::Schedule);
        }
        None => {}
    }
}

fn push(out: &mut Transitions, actuator: Actuator, step: Step, cause: Cause) {
    // Capacity equals the actuator count and each is visited once.
    let _ = out.push(Transition {
        actuator,
        active: step == Step::Start,
        cause,
    });
}
