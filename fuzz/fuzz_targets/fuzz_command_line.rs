//! Fuzz target: `protocol::parse_line`
//!
//! Drives arbitrary text into the instruction decoder and asserts that it
//! never panics, honours the line-length bound, and never yields a
//! timestamp outside the clock's accepted range.
//!
//! cargo fuzz run fuzz_command_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use petcare::app::commands::AppCommand;
use petcare::protocol::parse_line;

const MAX_LINE: usize = 1024;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    match parse_line(line, MAX_LINE) {
        Ok(AppCommand::SetTime(ts)) => {
            assert!(ts.validate().is_ok(), "decoder accepted out-of-range time {}", ts);
        }
        Ok(_) => assert!(line.len() <= MAX_LINE),
        Err(_) => {}
    }

    // The same text behind every SET_ prefix must also be safe.
    for prefix in ["SET_PROGRAMS:", "SET_LAMP_SCHEDULE:", "SET_TIME:"] {
        let _ = parse_line(&format!("{}{}", prefix, line), MAX_LINE * 2);
    }
});
