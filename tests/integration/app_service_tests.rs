//! Integration tests for the line → AppService → actuators pipeline.
//!
//! These run on the host (x86_64) and drive the service tick by tick, the
//! way the main loop does, against recording mocks.

use crate::mock_hw::{ActuatorCall, MockClock, MockHardware, RecordingSink};

use petcare::app::events::AppEvent;
use petcare::app::service::AppService;
use petcare::config::SystemConfig;
use petcare::control::ActuatorState;
use petcare::error::{TimeField, TimeParseError};

const FOOD_0800_0805: &str = r#"SET_PROGRAMS:[{"programStartTime":"08:00","programEndTime":"08:05","feedType":"Croquettes","enabled":true}]"#;
const FOOD_1200_1205: &str = r#"SET_PROGRAMS:[{"programStartTime":"12:00","programEndTime":"12:05"}]"#;
const WATER_0800_0805: &str = r#"SET_PROGRAMS:[{"programStartTime":"08:00","programEndTime":"08:05","feedType":"Eau"}]"#;

struct Rig {
    app: AppService,
    hw: MockHardware,
    clock: MockClock,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let mut rig = Self {
            app: AppService::new(SystemConfig::default()),
            hw: MockHardware::new(),
            clock: MockClock::at("2024-05-01T07:00:00"),
            sink: RecordingSink::new(),
        };
        rig.app.start(&mut rig.hw, &mut rig.sink);
        rig.hw.clear_calls();
        rig.sink.clear();
        rig
    }

    fn tick(&mut self, line: Option<&str>) {
        self.app.tick(line, &mut self.hw, &mut self.clock, &mut self.sink);
    }

    fn send(&mut self, line: &str) {
        self.tick(Some(line));
    }

    fn tick_at(&mut self, hour: u8, minute: u8) {
        self.clock.set_hm(hour, minute);
        self.tick(None);
    }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn start_drives_every_output_off_and_announces() {
    let mut app = AppService::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);

    assert!(hw.calls.contains(&ActuatorCall::Pump(false)));
    assert!(hw.calls.contains(&ActuatorCall::Pump2(false)));
    assert!(hw.calls.contains(&ActuatorCall::Led(false)));
    assert!(hw.calls.contains(&ActuatorCall::Lamp(false)));
    assert!(hw.calls.contains(&ActuatorCall::Servo(0)));
    assert!(matches!(sink.events.as_slice(), [AppEvent::Started]));
}

// ── Scheduled feeding window ──────────────────────────────────

#[test]
fn food_program_opens_and_closes_feeder() {
    let mut rig = Rig::new();
    rig.send(FOOD_0800_0805);
    assert_eq!(rig.app.context().schedule.program_count(), 1);

    rig.tick_at(8, 2);
    assert_eq!(
        rig.app.context().feeder,
        ActuatorState {
            active: true,
            manual_override: false
        }
    );
    assert_eq!(rig.hw.levels().servo_degrees, 90);
    assert!(rig.hw.levels().led);

    rig.tick_at(8, 6);
    assert!(!rig.app.context().feeder.active);
    assert_eq!(rig.hw.levels().servo_degrees, 0);
    assert!(!rig.hw.levels().led);

    assert_eq!(rig.sink.transitions(), ["START-FEEDING-AUTO", "STOP-FEEDING-AUTO"]);
}

#[test]
fn every_transition_is_followed_by_a_status_report() {
    let mut rig = Rig::new();
    rig.send(FOOD_0800_0805);
    rig.sink.clear();
    rig.tick_at(8, 2);

    let [AppEvent::Transition { status: at_switch, .. }, AppEvent::Status(report)] = rig.sink.events.as_slice() else {
        panic!("expected transition then status, got {:?}", rig.sink.events);
    };
    assert!(report.feeding_active);
    assert_eq!(report.servo_position, 90);
    assert_eq!(at_switch, report);
}

#[test]
fn disabled_program_never_fires() {
    let mut rig = Rig::new();
    rig.send(r#"SET_PROGRAMS:[{"programStartTime":"08:00","programEndTime":"08:05","enabled":false}]"#);
    rig.tick_at(8, 2);
    assert!(!rig.app.context().feeder.active);
    assert!(rig.sink.transitions().is_empty());
}

#[test]
fn overlapping_programs_keep_output_on_until_last_window_closes() {
    let mut rig = Rig::new();
    rig.send(concat!(
        r#"SET_PROGRAMS:[{"programStartTime":"08:00","programEndTime":"08:05","feedType":"Eau"},"#,
        r#"{"programStartTime":"08:03","programEndTime":"08:10","feedType":"Eau"}]"#
    ));
    rig.tick_at(8, 1);
    rig.tick_at(8, 6);
    assert!(rig.app.context().primary_pump.active);
    rig.tick_at(8, 10);
    assert!(!rig.app.context().primary_pump.active);
    assert_eq!(rig.sink.transitions(), ["START-WATER-AUTO", "STOP-WATER-AUTO"]);
}

// ── Manual override ───────────────────────────────────────────

#[test]
fn manual_session_survives_schedule_absence() {
    let mut rig = Rig::new();
    rig.send("START_WATER");
    assert_eq!(
        rig.app.context().primary_pump,
        ActuatorState {
            active: true,
            manual_override: true
        }
    );

    for minute in 0..30 {
        rig.tick_at(9, minute);
    }
    assert!(rig.app.context().primary_pump.active);
    assert!(rig.hw.levels().pump);

    rig.send("STOP_WATER");
    assert_eq!(rig.app.context().primary_pump, ActuatorState::default());
    assert!(!rig.hw.levels().pump);
}

#[test]
fn manual_stop_hands_feeder_back_to_schedule() {
    let mut rig = Rig::new();
    rig.send(FOOD_0800_0805);
    rig.clock.set_hm(7, 59);
    rig.send("START_FEEDING");
    rig.send("STOP_FEEDING");
    rig.tick_at(8, 1);
    assert_eq!(
        rig.app.context().feeder,
        ActuatorState {
            active: true,
            manual_override: false
        }
    );
    rig.tick_at(8, 5);
    assert!(!rig.app.context().feeder.active, "automatic session ends with the window");
}

// ── Immediate stop + lockout ──────────────────────────────────

#[test]
fn immediate_stop_locks_out_category_until_reupload() {
    let mut rig = Rig::new();
    rig.send(WATER_0800_0805);
    rig.tick_at(8, 1);
    assert!(rig.app.context().primary_pump.active);

    rig.clock.set_hm(8, 2);
    rig.send("STOP_WATER_IMMEDIATE");
    assert!(!rig.app.context().primary_pump.active);
    assert!(!rig.app.context().lockouts.water_programs_enabled);

    for minute in 2..5 {
        rig.tick_at(8, minute);
        assert!(!rig.app.context().primary_pump.active, "locked out at 08:{:02}", minute);
    }

    // A food-only upload does not re-arm water.
    rig.send(FOOD_1200_1205);
    rig.tick_at(8, 3);
    assert!(!rig.app.context().primary_pump.active);

    rig.send(WATER_0800_0805);
    rig.tick_at(8, 4);
    assert!(rig.app.context().primary_pump.active);
    assert_eq!(
        rig.sink.transitions(),
        ["START-WATER-AUTO", "STOP-WATER-IMMEDIATE", "START-WATER-AUTO"]
    );
}

#[test]
fn immediate_stop_ends_manual_session() {
    let mut rig = Rig::new();
    rig.send("START_FEEDING");
    rig.send("STOP_FEEDING_IMMEDIATE");
    assert_eq!(rig.app.context().feeder, ActuatorState::default());
    assert!(!rig.app.context().lockouts.feed_programs_enabled);
    assert_eq!(rig.hw.levels().servo_degrees, 0);
}

// ── Reprogramming ─────────────────────────────────────────────

#[test]
fn upload_resets_outputs_and_drives_them_off() {
    let mut rig = Rig::new();
    rig.send("START_FEEDING");
    rig.send("START_WATER");
    rig.hw.clear_calls();

    rig.send(r#"SET_PROGRAMS:[]"#);
    assert_eq!(rig.app.context().feeder, ActuatorState::default());
    assert_eq!(rig.app.context().primary_pump, ActuatorState::default());
    assert!(rig.hw.calls.contains(&ActuatorCall::Servo(0)));
    assert!(rig.hw.calls.contains(&ActuatorCall::Pump(false)));
    assert!(!rig.hw.levels().led);
}

#[test]
fn malformed_upload_changes_nothing() {
    let mut rig = Rig::new();
    rig.send(FOOD_0800_0805);
    rig.send("START_WATER");
    rig.sink.clear();
    rig.hw.clear_calls();

    rig.send(r#"SET_PROGRAMS:[{"programStartTime":"08:00","programEndTime":"xx:05"}]"#);
    rig.send("SET_PROGRAMS:{not json");

    assert_eq!(rig.app.context().schedule.program_count(), 1);
    assert!(rig.app.context().primary_pump.manual_override);
    assert!(rig.hw.calls.is_empty());
    assert!(rig.sink.statuses().is_empty(), "rejections are diagnostic only");
    assert_eq!(
        rig.sink
            .events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandRejected(_)))
            .count(),
        2
    );
}

// ── Lamp ──────────────────────────────────────────────────────

#[test]
fn lamp_follows_overnight_window() {
    let mut rig = Rig::new();
    rig.send(r#"SET_LAMP_SCHEDULE:{"startTime":"20:00","endTime":"06:00"}"#);
    rig.tick_at(19, 59);
    assert!(!rig.hw.levels().lamp);
    rig.tick_at(23, 0);
    assert!(rig.hw.levels().lamp);
    rig.tick_at(5, 59);
    assert!(rig.hw.levels().lamp);
    rig.tick_at(6, 0);
    assert!(!rig.hw.levels().lamp);
}

// ── Backup pump ───────────────────────────────────────────────

#[test]
fn backup_pump_tracks_water_level() {
    let mut rig = Rig::new();
    let mut seen = Vec::new();
    for level in [15.0, 9.0, 12.0, 8.0] {
        rig.hw.set_water_level(level);
        rig.tick(None);
        seen.push(rig.hw.levels().pump2);
    }
    assert_eq!(seen, [false, true, false, true]);
    assert_eq!(
        rig.sink.transitions(),
        ["START-WATER2-AUTO", "STOP-WATER2-AUTO", "START-WATER2-AUTO"]
    );
}

#[test]
fn backup_pump_ignores_manual_commands() {
    let mut rig = Rig::new();
    rig.hw.set_water_level(5.0);
    rig.tick(None);
    assert!(rig.hw.levels().pump2);
    rig.send("STOP_WATER");
    assert!(rig.hw.levels().pump2, "STOP_WATER drives the primary pump only");
}

// ── Clock ─────────────────────────────────────────────────────

#[test]
fn set_time_rejects_month_13_without_acknowledgment() {
    let mut rig = Rig::new();
    let before = rig.clock.now;
    rig.send("SET_TIME:2021-13-05T10:00:00");
    assert_eq!(rig.clock.now, before);
    assert_eq!(rig.clock.adjustments, 0);
    assert!(rig.sink.statuses().is_empty());
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::ClockRejected(TimeParseError::OutOfRange {
            field: TimeField::Month,
            value: 13
        })
    )));
}

#[test]
fn set_time_applies_and_schedules_follow() {
    let mut rig = Rig::new();
    rig.send(FOOD_0800_0805);
    rig.send("SET_TIME:2021-06-05T08:01:00");
    assert_eq!(rig.clock.now.to_string(), "2021-06-05T08:01:00");
    assert!(rig.app.context().feeder.active, "same tick reconciles against the new time");
}

// ── Protocol handling ─────────────────────────────────────────

#[test]
fn get_status_reports_without_switching() {
    let mut rig = Rig::new();
    rig.send("GET_STATUS");
    assert!(rig.hw.calls.is_empty());
    let statuses = rig.sink.statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].water_level, 50.0);
    assert_eq!(statuses[0].temperature, 21.5);
}

#[test]
fn unknown_line_is_logged_and_ignored() {
    let mut rig = Rig::new();
    rig.send("start_feeding");
    assert!(!rig.app.context().feeder.active);
    assert!(matches!(rig.sink.events.as_slice(), [AppEvent::CommandRejected(_)]));
}

#[test]
fn one_line_per_tick() {
    let mut rig = Rig::new();
    let queue = ["START_FEEDING", "START_WATER", "START_LAMP"];
    for (i, line) in queue.iter().enumerate() {
        rig.send(line);
        assert_eq!(rig.sink.transitions().len(), i + 1);
    }
    assert_eq!(rig.app.tick_count(), 3);
}
