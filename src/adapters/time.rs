//! Software real-time clock.
//!
//! Keeps wall-clock time as "last set value + monotonic time since then".
//!
//! - **`feature = "espidf"`**: the monotonic source is
//!   `esp_timer_get_time()` (microsecond precision).
//! - **host**: `std::time::Instant`.
//!
//! Nothing is persisted: after a power cycle the clock restarts from
//! [`SoftRtc::BOOT_TIME`] until the host sends `SET_TIME`.

use crate::app::ports::ClockPort;
use crate::time::Timestamp;

pub struct SoftRtc {
    base: Timestamp,
    base_secs: u64,
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for SoftRtc {
    fn default() -> Self {
        Self::new(Self::BOOT_TIME)
    }
}

impl SoftRtc {
    /// Clock value before the first `SET_TIME`.
    pub const BOOT_TIME: Timestamp = Timestamp {
        year: 2020,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };

    pub fn new(base: Timestamp) -> Self {
        let mut rtc = Self {
            base,
            base_secs: 0,
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        };
        rtc.base_secs = rtc.uptime_secs();
        rtc
    }

    /// Seconds since boot (monotonic).
    #[cfg(feature = "espidf")]
    pub fn uptime_secs(&self) -> u64 {
        // SAFETY: esp_timer is started by the IDF before app_main.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000
    }

    /// Seconds since boot (monotonic).
    #[cfg(not(feature = "espidf"))]
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

impl ClockPort for SoftRtc {
    fn now(&self) -> Timestamp {
        self.base.add_seconds(self.uptime_secs().saturating_sub(self.base_secs))
    }

    fn adjust(&mut self, ts: Timestamp) {
        self.base = ts;
        self.base_secs = self.uptime_secs();
    }
}
