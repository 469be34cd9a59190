//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the [`ControlContext`] and the reconciler.  It
//! exposes a clean, hardware-agnostic API.  All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  line ──────▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  ClockPort ──▶│          AppService          │
//!  SensorPort ─▶│  protocol · context · engine │
//! ActuatorPort ◀│                              │
//!               └──────────────────────────────┘
//! ```
//!
//! ## Tick order
//!
//! 1. Decode and apply at most one instruction line.
//! 2. Sample the clock and sensors.
//! 3. Reconcile: backup pump, feeder, primary pump, lamp.
//! 4. Push each transition to hardware, then emit it with a fresh status.
//! 5. Heartbeat, if due.

use log::{LevelFilter, debug, info};

use crate::config::SystemConfig;
use crate::control::reconcile::Reconciler;
use crate::control::{Actuator, ControlContext, Transition};
use crate::error::CommandError;
use crate::protocol;
use crate::reservoir::ReservoirGuard;
use crate::status::StatusReport;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, ClockPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    ctx: ControlContext,
    config: SystemConfig,
    reconciler: Reconciler,
    tick_count: u64,
    heartbeat_ticks: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let reconciler = Reconciler::new(ReservoirGuard::new(&config));
        let heartbeat_ticks = config.heartbeat_ticks();
        Self {
            ctx: ControlContext::new(),
            config,
            reconciler,
            tick_count: 0,
            heartbeat_ticks,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to its inactive level and announce readiness.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off(self.config.feeder_closed_degrees);
        sink.emit(&AppEvent::Started);
        info!(
            "AppService started (tick {} ms, backup pump < {:.1}%)",
            self.config.tick_interval_ms, self.config.backup_pump_threshold_percent
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        line: Option<&str>,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. One instruction, if any
        if let Some(line) = line {
            self.handle_line(line, hw, clock, sink);
        }

        // 2. Sample inputs (after the command, so SET_TIME applies now)
        let now = clock.now();
        let snapshot = hw.read_all();

        // 3. Reconcile
        let transitions = self
            .reconciler
            .run(&mut self.ctx, now.time_of_day(), snapshot.water_level_percent);

        // 4. Apply
        for transition in transitions {
            self.apply_transition(transition, hw, sink);
        }

        // 5. Heartbeat
        if self.tick_count % self.heartbeat_ticks == 0 {
            sink.emit(&AppEvent::Heartbeat {
                now,
                programs: self.ctx.schedule.program_count(),
            });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Decode one raw instruction line and act on it.  Decode failures are
    /// reported as diagnostic events and change nothing.
    pub fn handle_line(
        &mut self,
        line: &str,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        info!("[COMMAND] Received: {}", line.trim());
        match protocol::parse_line(line, self.config.max_line_len) {
            Ok(cmd) => self.handle_command(cmd, hw, clock, sink),
            Err(CommandError::BadTimestamp(e)) => sink.emit(&AppEvent::ClockRejected(e)),
            Err(e) => sink.emit(&AppEvent::CommandRejected(e)),
        }
    }

    /// Process a decoded command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::Start(actuator) => {
                if let Some(t) = self.ctx.manual_start(actuator) {
                    self.apply_transition(t, hw, sink);
                }
            }
            AppCommand::Stop(actuator) => {
                if let Some(t) = self.ctx.manual_stop(actuator) {
                    self.apply_transition(t, hw, sink);
                }
            }
            AppCommand::StopImmediate(category) => {
                let t = self.ctx.immediate_stop(category);
                self.apply_transition(t, hw, sink);
            }
            AppCommand::GetStatus => {
                let status = self.status(hw);
                sink.emit(&AppEvent::Status(status));
            }
            AppCommand::SetPrograms(programs) => {
                let (outcome, stopped) = self.ctx.replace_programs(programs);
                sink.emit(&AppEvent::ProgramsReplaced(outcome));
                for t in stopped {
                    self.apply_transition(t, hw, sink);
                }
            }
            AppCommand::SetLampSchedule(window) => {
                self.ctx.replace_lamp_schedule(window);
                sink.emit(&AppEvent::LampScheduleReplaced(window));
            }
            AppCommand::SetTime(ts) => {
                clock.adjust(ts);
                sink.emit(&AppEvent::ClockAdjusted(ts));
            }
            AppCommand::DebugOn => {
                log::set_max_level(LevelFilter::Debug);
                sink.emit(&AppEvent::DebugEnabled);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Fresh status: reads sensors and output levels now.
    pub fn status(&self, hw: &mut (impl SensorPort + ActuatorPort)) -> StatusReport {
        let sensors = hw.read_all();
        StatusReport::capture(&self.ctx, hw.readback(), sensors)
    }

    pub fn context(&self) -> &ControlContext {
        &self.ctx
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Push one transition to hardware, then report it.
    fn apply_transition(
        &self,
        t: Transition,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        debug!("Apply {}", t);
        match t.actuator {
            Actuator::Feeder => {
                let degrees = if t.active {
                    self.config.feeder_open_degrees
                } else {
                    self.config.feeder_closed_degrees
                };
                hw.set_feeder_servo(degrees);
                hw.set_led(self.ctx.led_on());
            }
            Actuator::PrimaryPump => {
                hw.set_primary_pump(t.active);
                hw.set_led(self.ctx.led_on());
            }
            Actuator::BackupPump => hw.set_backup_pump(t.active),
            Actuator::Lamp => hw.set_lamp(t.active),
        }

        let status = self.status(hw);
        sink.emit(&AppEvent::Transition { transition: t, status });
        sink.emit(&AppEvent::Status(status));
    }
}
