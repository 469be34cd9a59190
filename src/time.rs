//! Wall-clock value types and their fixed-layout parsers.
//!
//! Two text layouts reach the controller over the command channel:
//!
//! ```text
//!   HH:MM...              schedule start/end times (trailing chars ignored)
//!   YYYY-MM-DD?HH:MM:SS   SET_TIME payload (separators not inspected)
//!   0123456789012345678
//! ```
//!
//! Both are read at fixed character offsets.  Unlike a lenient "take the
//! digits you find" reader, every field must be numeric and in range or the
//! whole string is rejected with a [`TimeParseError`].

use core::fmt;

use crate::error::{TimeField, TimeParseError};

// ---------------------------------------------------------------------------
// TimeOfDay
// ---------------------------------------------------------------------------

/// Hour and minute on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// Build a time of day, rejecting out-of-range fields.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeParseError> {
        if hour > 23 {
            return Err(TimeParseError::OutOfRange {
                field: TimeField::Hour,
                value: hour.into(),
            });
        }
        if minute > 59 {
            return Err(TimeParseError::OutOfRange {
                field: TimeField::Minute,
                value: minute.into(),
            });
        }
        Ok(Self { hour, minute })
    }

    /// Parse the `HH:MM` prefix of `s`.  Anything after offset 5 is ignored,
    /// so `"08:30"` and `"08:30:00"` both yield 08:30.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let bytes = s.as_bytes();
        if bytes.len() < 5 {
            return Err(TimeParseError::TooShort {
                expected: 5,
                actual: bytes.len(),
            });
        }
        if bytes[2] != b':' {
            return Err(TimeParseError::BadSeparator { offset: 2 });
        }
        let hour = digits(bytes, 0, 2, TimeField::Hour)?;
        let minute = digits(bytes, 3, 2, TimeField::Minute)?;
        Self::new(hour as u8, minute as u8)
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since 00:00 (0 – 1439).
    pub fn minutes_since_midnight(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Calendar date and time as held by the real-time clock.  No timezone.
///
/// Validation mirrors what the clock hardware accepts: the day is checked
/// against 1–31 only, with no month-length or leap-year rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Minimum length of a `SET_TIME` payload.
const TIMESTAMP_LEN: usize = 19;

impl Timestamp {
    /// Parse the fixed-width `YYYY-MM-DDTHH:MM:SS` layout.  Separator
    /// characters are not inspected (hosts send either `T` or a space).
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let bytes = s.as_bytes();
        if bytes.len() < TIMESTAMP_LEN {
            return Err(TimeParseError::TooShort {
                expected: TIMESTAMP_LEN,
                actual: bytes.len(),
            });
        }
        let ts = Self {
            year: digits(bytes, 0, 4, TimeField::Year)?,
            month: digits(bytes, 5, 2, TimeField::Month)? as u8,
            day: digits(bytes, 8, 2, TimeField::Day)? as u8,
            hour: digits(bytes, 11, 2, TimeField::Hour)? as u8,
            minute: digits(bytes, 14, 2, TimeField::Minute)? as u8,
            second: digits(bytes, 17, 2, TimeField::Second)? as u8,
        };
        ts.validate()?;
        Ok(ts)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), TimeParseError> {
        check(TimeField::Year, self.year, 2020, 2099)?;
        check(TimeField::Month, self.month.into(), 1, 12)?;
        check(TimeField::Day, self.day.into(), 1, 31)?;
        check(TimeField::Hour, self.hour.into(), 0, 23)?;
        check(TimeField::Minute, self.minute.into(), 0, 59)?;
        check(TimeField::Second, self.second.into(), 0, 59)?;
        Ok(())
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay {
            hour: self.hour,
            minute: self.minute,
        }
    }

    /// Advance by `secs` seconds, rolling days, months and years over.
    pub fn add_seconds(self, secs: u64) -> Self {
        let of_day = self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64;
        let total = of_day + secs;
        let mut out = Self {
            hour: ((total % 86_400) / 3600) as u8,
            minute: ((total % 3600) / 60) as u8,
            second: (total % 60) as u8,
            ..self
        };
        for _ in 0..total / 86_400 {
            out.advance_day();
        }
        out
    }

    fn advance_day(&mut self) {
        // `>=` also normalises dates like 02-31 that the clock accepted as-is.
        if self.day >= days_in_month(self.year, self.month) {
            self.day = 1;
            if self.month >= 12 {
                self.month = 1;
                self.year = self.year.saturating_add(1);
            } else {
                self.month += 1;
            }
        } else {
            self.day += 1;
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

// ── Internal ──────────────────────────────────────────────────

fn digits(bytes: &[u8], start: usize, len: usize, field: TimeField) -> Result<u16, TimeParseError> {
    let mut value: u16 = 0;
    for &b in &bytes[start..start + len] {
        if !b.is_ascii_digit() {
            return Err(TimeParseError::NotDigits(field));
        }
        value = value * 10 + (b - b'0') as u16;
    }
    Ok(value)
}

fn check(field: TimeField, value: u16, min: u16, max: u16) -> Result<(), TimeParseError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TimeParseError::OutOfRange { field, value })
    }
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        _ => 31,
    }
}
