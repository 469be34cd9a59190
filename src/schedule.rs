//! Schedule store: feeding/watering programs and the lamp schedule.
//!
//! ```text
//!  SET_PROGRAMS ─────▶ ┌──────────────────────────────┐
//!                      │ ScheduleStore                │
//!  SET_LAMP_SCHEDULE ─▶│  programs: [FeedingProgram;10]│──▶ Reconciliation (read every tick)
//!                      │  lamp:     ScheduleWindow    │
//!                      └──────────────────────────────┘
//! ```
//!
//! Both tables are swapped wholesale; nothing is ever edited in place.

use heapless::Vec;
use log::{info, warn};

use crate::time::TimeOfDay;

/// Maximum number of programs held at once.  Extras in an upload are dropped.
pub const MAX_PROGRAMS: usize = 10;

// ═══════════════════════════════════════════════════════════════
//  Windows
// ═══════════════════════════════════════════════════════════════

/// A half-open `[start, end)` interval on a 24-hour clock.
///
/// `end < start` wraps past midnight.  `start == end` is a zero-length
/// window and is never active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub enabled: bool,
}

impl ScheduleWindow {
    pub const fn new(start: TimeOfDay, end: TimeOfDay, enabled: bool) -> Self {
        Self {
            start,
            end,
            enabled,
        }
    }

    /// The boot-time lamp schedule: 00:00–00:00, disabled.
    pub const fn disabled() -> Self {
        Self::new(TimeOfDay::MIDNIGHT, TimeOfDay::MIDNIGHT, false)
    }

    /// Whether `now` falls inside the window, ignoring `enabled`.
    pub fn is_active(&self, now: TimeOfDay) -> bool {
        let cur = now.minutes_since_midnight();
        let s = self.start.minutes_since_midnight();
        let e = self.end.minutes_since_midnight();
        if e < s {
            // e.g. 22:00–06:00 (overnight, wraps around midnight)
            cur >= s || cur < e
        } else {
            // e.g. 08:00–08:05; empty when s == e
            s <= cur && cur < e
        }
    }

    /// Enabled and inside the window.
    pub fn enabled_at(&self, now: TimeOfDay) -> bool {
        self.enabled && self.is_active(now)
    }
}

/// The lamp runs off a single window.
pub type LampSchedule = ScheduleWindow;

// ═══════════════════════════════════════════════════════════════
//  Programs
// ═══════════════════════════════════════════════════════════════

/// Which actuator and lockout flag a program drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Water,
}

impl Category {
    /// Wire tag used by the host for water programs.  Anything else is food.
    pub const WATER_FEED_TYPE: &'static str = "Eau";

    pub fn from_feed_type(feed_type: &str) -> Self {
        if feed_type == Self::WATER_FEED_TYPE {
            Self::Water
        } else {
            Self::Food
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Water => "water",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedingProgram {
    pub window: ScheduleWindow,
    pub category: Category,
}

/// Which categories appeared in an accepted upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorySet {
    pub food: bool,
    pub water: bool,
}

impl CategorySet {
    pub fn insert(&mut self, category: Category) {
        match category {
            Category::Food => self.food = true,
            Category::Water => self.water = true,
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Food => self.food,
            Category::Water => self.water,
        }
    }
}

/// Outcome of [`ScheduleStore::replace_programs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramsReplaced {
    pub accepted: usize,
    pub dropped: usize,
    pub categories: CategorySet,
}

// ═══════════════════════════════════════════════════════════════
//  Store
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ScheduleStore {
    programs: Vec<FeedingProgram, MAX_PROGRAMS>,
    lamp: LampSchedule,
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self {
            programs: Vec::new(),
            lamp: ScheduleWindow::disabled(),
        }
    }

    /// Atomically swap in a new program list.  The first [`MAX_PROGRAMS`]
    /// entries are kept; the rest are dropped.
    pub fn replace_programs<I>(&mut self, programs: I) -> ProgramsReplaced
    where
        I: IntoIterator<Item = FeedingProgram>,
    {
        let mut next: Vec<FeedingProgram, MAX_PROGRAMS> = Vec::new();
        let mut categories = CategorySet::default();
        let mut dropped = 0;

        for program in programs {
            if next.push(program).is_err() {
                dropped += 1;
                continue;
            }
            categories.insert(program.category);
        }

        if dropped > 0 {
            warn!("Schedule: {} program(s) over capacity dropped", dropped);
        }
        self.programs = next;
        info!("Schedule: {} program(s) loaded", self.programs.len());

        ProgramsReplaced {
            accepted: self.programs.len(),
            dropped,
            categories,
        }
    }

    pub fn replace_lamp_schedule(&mut self, window: LampSchedule) {
        info!(
            "Schedule: lamp {}–{} ({})",
            window.start,
            window.end,
            if window.enabled { "enabled" } else { "disabled" }
        );
        self.lamp = window;
    }

    pub fn programs(&self) -> &[FeedingProgram] {
        &self.programs
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn lamp_schedule(&self) -> LampSchedule {
        self.lamp
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
