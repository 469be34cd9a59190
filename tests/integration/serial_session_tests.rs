//! End-to-end sessions over the simulated board.
//!
//! Scripted instruction lines go through the real [`LineReader`] and the
//! status reports come back as JSON lines from [`SerialEventSink`], exactly
//! what a host application would see on the wire.

use std::io::Cursor;
use std::thread;
use std::time::{Duration, Instant};

use petcare::adapters::serial::{LineReader, SerialEventSink};
use petcare::adapters::sim::{SimClock, SimHardware};
use petcare::app::service::AppService;
use petcare::config::SystemConfig;
use petcare::time::Timestamp;
use serde_json::Value;

/// Run `script` one line per tick until the reader drains, then return the
/// JSON objects written to the command channel.
fn run_session(script: impl AsRef<[u8]>, start: &str, hw: &mut SimHardware) -> Vec<Value> {
    let mut reader = LineReader::spawn(Cursor::new(script.as_ref().to_vec())).expect("spawn reader");
    let mut clock = SimClock::new(Timestamp::parse(start).expect("valid start time"));
    let mut sink = SerialEventSink::new(Vec::new());
    let mut app = AppService::new(SystemConfig::default());
    app.start(hw, &mut sink);

    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        let line = reader.poll_line();
        if line.is_none() && reader.is_closed() {
            break;
        }
        if line.is_none() {
            thread::sleep(Duration::from_millis(1));
            continue;
        }
        app.tick(line.as_deref(), hw, &mut clock, &mut sink);
        clock.advance_secs(1);
    }

    String::from_utf8(sink.into_inner())
        .expect("utf-8 output")
        .lines()
        .map(|l| serde_json::from_str(l).expect("every output line is a JSON object"))
        .collect()
}

#[test]
fn status_lines_carry_every_field() {
    let mut hw = SimHardware::default();
    let out = run_session("GET_STATUS\n", "2024-01-01T12:00:00", &mut hw);
    assert_eq!(out.len(), 1);

    let obj = out[0].as_object().expect("object");
    for key in [
        "feedingActive",
        "waterActive",
        "water2Active",
        "ledState",
        "pumpState",
        "pump2State",
        "servoPosition",
        "lampState",
        "waterLevel",
        "temperature",
        "humidity",
        "lightLevel",
    ] {
        assert!(obj.contains_key(key), "missing {}", key);
    }
    assert_eq!(obj.len(), 12);
    assert_eq!(obj["servoPosition"], 0);
    assert_eq!(obj["waterLevel"], 50.0);
}

#[test]
fn manual_water_session_is_visible_on_the_wire() {
    let mut hw = SimHardware::default();
    let out = run_session("START_WATER\n\nSTOP_WATER\n", "2024-01-01T12:00:00", &mut hw);
    assert_eq!(out.len(), 2, "one report per transition, blank lines skipped");

    assert_eq!(out[0]["waterActive"], true);
    assert_eq!(out[0]["pumpState"], true);
    assert_eq!(out[0]["ledState"], true);
    assert_eq!(out[1]["waterActive"], false);
    assert_eq!(out[1]["pumpState"], false);

    // Active-low relay released at the end of the session.
    assert!(hw.actuators.pins().pump.is_high());
}

#[test]
fn rejected_lines_produce_no_output() {
    let mut hw = SimHardware::default();
    let script = "NOPE\nSET_TIME:2021-13-05T10:00:00\nSET_PROGRAMS:[oops]\nSET_LAMP_SCHEDULE:{}\n";
    let out = run_session(script, "2024-01-01T12:00:00", &mut hw);
    assert!(out.is_empty());
}

#[test]
fn corrupted_bytes_do_not_stop_later_instructions() {
    let mut hw = SimHardware::default();
    let out = run_session(b"\xff\xfe\nSTART_WATER\nGET_STATUS\n", "2024-01-01T12:00:00", &mut hw);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["waterActive"], true);
    assert_eq!(out[1]["pumpState"], true);
}

#[test]
fn scheduled_lamp_and_disconnected_dht() {
    let mut hw = SimHardware::default();
    hw.sensors.set_dht(f32::NAN, f32::NAN);
    let script = "SET_LAMP_SCHEDULE:{\"startTime\":\"11:00\",\"endTime\":\"13:00\"}\n";
    let out = run_session(script, "2024-01-01T12:00:00", &mut hw);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["lampState"], true);
    assert_eq!(out[0]["temperature"], -1.0);
    assert_eq!(out[0]["humidity"], -1.0);
}
