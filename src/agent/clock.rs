//! Wall clock used by the clock query

use chrono::{Local, NaiveTime};

/// Source of the current local time of day
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> NaiveTime;
}

/// Reads the system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Always reports the same time
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// Format a time as spoken by the agent (`HH:MM`)
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
