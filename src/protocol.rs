//! Line-oriented instruction protocol.
//!
//! ```text
//!   START_FEEDING | STOP_FEEDING | START_WATER | STOP_WATER | START_LAMP | STOP_LAMP
//!   STOP_FEEDING_IMMEDIATE | STOP_WATER_IMMEDIATE
//!   GET_STATUS | DEBUG_ON
//!   SET_PROGRAMS:[{"programStartTime":"08:00","programEndTime":"08:05","feedType":"Eau","enabled":true}, ...]
//!   SET_LAMP_SCHEDULE:{"startTime":"20:00","endTime":"06:00","enabled":true}
//!   SET_TIME:2024-03-01T07:30:00
//! ```
//!
//! Fixed instructions match exactly (case-sensitive) after trimming
//! surrounding whitespace; the three `SET_*` forms match by prefix.
//! Decoding is all-or-nothing: a single bad entry rejects the line and
//! nothing downstream sees a partial payload.

use serde::Deserialize;

use crate::app::commands::AppCommand;
use crate::control::Actuator;
use crate::error::CommandError;
use crate::schedule::{Category, FeedingProgram, ScheduleWindow};
use crate::time::{TimeOfDay, Timestamp};

pub const SET_PROGRAMS: &str = "SET_PROGRAMS:";
pub const SET_LAMP_SCHEDULE: &str = "SET_LAMP_SCHEDULE:";
pub const SET_TIME: &str = "SET_TIME:";

// ───────────────────────────────────────────────────────────────
// Wire payloads
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgramPayload {
    program_start_time: String,
    program_end_time: String,
    /// Missing or null is treated as food.
    #[serde(default)]
    feed_type: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LampPayload {
    start_time: String,
    end_time: String,
    #[serde(default)]
    enabled: Option<bool>,
}

fn window(index: usize, start: &str, end: &str, enabled: Option<bool>) -> Result<ScheduleWindow, CommandError> {
    let bad = |source| CommandError::BadScheduleTime { index, source };
    Ok(ScheduleWindow::new(
        TimeOfDay::parse(start).map_err(bad)?,
        TimeOfDay::parse(end).map_err(bad)?,
        enabled.unwrap_or(true),
    ))
}

// ───────────────────────────────────────────────────────────────
// Parsing
// ───────────────────────────────────────────────────────────────

/// Decode one instruction line.  `max_len` bounds the raw line length.
pub fn parse_line(line: &str, max_len: usize) -> Result<AppCommand, CommandError> {
    if line.len() > max_len {
        return Err(CommandError::LineTooLong {
            len: line.len(),
            max: max_len,
        });
    }
    let line = line.trim();

    let cmd = match line {
        "START_FEEDING" => AppCommand::Start(Actuator::Feeder),
        "STOP_FEEDING" => AppCommand::Stop(Actuator::Feeder),
        "START_WATER" => AppCommand::Start(Actuator::PrimaryPump),
        "STOP_WATER" => AppCommand::Stop(Actuator::PrimaryPump),
        "START_LAMP" => AppCommand::Start(Actuator::Lamp),
        "STOP_LAMP" => AppCommand::Stop(Actuator::Lamp),
        "STOP_FEEDING_IMMEDIATE" => AppCommand::StopImmediate(Category::Food),
        "STOP_WATER_IMMEDIATE" => AppCommand::StopImmediate(Category::Water),
        "GET_STATUS" => AppCommand::GetStatus,
        "DEBUG_ON" => AppCommand::DebugOn,
        _ => {
            if let Some(json) = line.strip_prefix(SET_PROGRAMS) {
                AppCommand::SetPrograms(parse_programs(json)?)
            } else if let Some(json) = line.strip_prefix(SET_LAMP_SCHEDULE) {
                AppCommand::SetLampSchedule(parse_lamp_schedule(json)?)
            } else if let Some(ts) = line.strip_prefix(SET_TIME) {
                AppCommand::SetTime(Timestamp::parse(ts).map_err(CommandError::BadTimestamp)?)
            } else {
                return Err(CommandError::Unrecognized(line.to_owned()));
            }
        }
    };
    Ok(cmd)
}

/// Decode a `SET_PROGRAMS` JSON array.  Entries beyond the store capacity
/// are still decoded and validated; the store drops them on insert.
pub fn parse_programs(json: &str) -> Result<Vec<FeedingProgram>, CommandError> {
    let entries: Vec<ProgramPayload> = serde_json::from_str(json)?;
    entries
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Ok(FeedingProgram {
                window: window(i, &p.program_start_time, &p.program_end_time, p.enabled)?,
                category: p
                    .feed_type
                    .as_deref()
                    .map_or(Category::Food, Category::from_feed_type),
            })
        })
        .collect()
}

/// Decode a `SET_LAMP_SCHEDULE` JSON object.
pub fn parse_lamp_schedule(json: &str) -> Result<ScheduleWindow, CommandError> {
    let p: LampPayload = serde_json::from_str(json)?;
    window(0, &p.start_time, &p.end_time, p.enabled)
}
