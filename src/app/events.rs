//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Only [`AppEvent::Status`]
//! belongs on the command channel; the rest are diagnostics.

use crate::control::Transition;
use crate::error::{CommandError, TimeParseError};
use crate::schedule::{LampSchedule, ProgramsReplaced};
use crate::status::StatusReport;
use crate::time::Timestamp;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started and every output is off.
    Started,

    /// Status snapshot, after every transition and on `GET_STATUS`.
    Status(StatusReport),

    /// An output switched.  Carries the status at the moment of switching
    /// so the diagnostic line shows the full picture.
    Transition {
        transition: Transition,
        status: StatusReport,
    },

    /// A `SET_PROGRAMS` upload was accepted.
    ProgramsReplaced(ProgramsReplaced),

    /// A `SET_LAMP_SCHEDULE` upload was accepted.
    LampScheduleReplaced(LampSchedule),

    /// The clock was set by `SET_TIME`.
    ClockAdjusted(Timestamp),

    /// A `SET_TIME` value was rejected; the clock is unchanged.
    ClockRejected(TimeParseError),

    /// An instruction line could not be decoded; nothing changed.
    CommandRejected(CommandError),

    /// Detailed logging switched on by `DEBUG_ON`.
    DebugEnabled,

    /// Periodic liveness line.
    Heartbeat { now: Timestamp, programs: usize },
}
