//! Inbound commands to the application service.
//!
//! One instruction line from the serial channel decodes to one
//! [`AppCommand`] (see [`crate::protocol::parse_line`]).  The
//! [`AppService`](super::service::AppService) interprets and acts upon it
//! at the start of a tick.

use crate::control::Actuator;
use crate::schedule::{Category, FeedingProgram, LampSchedule};
use crate::time::Timestamp;

/// Commands the operator (or the host application) can send to the core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// `START_FEEDING` / `START_WATER` / `START_LAMP`: manual session on.
    Start(Actuator),

    /// `STOP_FEEDING` / `STOP_WATER` / `STOP_LAMP`: manual session off.
    Stop(Actuator),

    /// `STOP_FEEDING_IMMEDIATE` / `STOP_WATER_IMMEDIATE`: off, and trip the
    /// category lockout until the next program upload.
    StopImmediate(Category),

    /// `GET_STATUS`: emit a status report, nothing else.
    GetStatus,

    /// `SET_PROGRAMS:<json array>`: replace the whole program table.
    SetPrograms(Vec<FeedingProgram>),

    /// `SET_LAMP_SCHEDULE:<json object>`: replace the lamp window.
    SetLampSchedule(LampSchedule),

    /// `SET_TIME:<timestamp>`: adjust the clock.  Range checks happen at
    /// parse time; see [`Timestamp::validate`].
    SetTime(Timestamp),

    /// `DEBUG_ON`: raise the diagnostic log level.
    DebugOn,
}
