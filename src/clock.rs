//! Clock readout from raw timer ticks.

use core::fmt;

const SECONDS_PER_MINUTE: u64 = 60;
const MINUTES_PER_HOUR: u64 = 60;
const HOURS_PER_DAY: u64 = 24;

/// Wall-clock style view of a tick count.
///
/// Only the display wraps; the tick count it came from is never reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockReadout {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl ClockReadout {
    /// Convert `ticks` counted at `ticks_per_second`.
    ///
    /// `ticks_per_second` must be non-zero (checked by config validation).
    pub fn from_ticks(ticks: u64, ticks_per_second: u64) -> Self {
        let total_seconds = ticks / ticks_per_second;
        let total_minutes = total_seconds / SECONDS_PER_MINUTE;
        let total_hours = total_minutes / MINUTES_PER_HOUR;

        Self {
            hours: (total_hours % HOURS_PER_DAY) as u8,
            minutes: (total_minutes % MINUTES_PER_HOUR) as u8,
            seconds: (total_seconds % SECONDS_PER_MINUTE) as u8,
        }
    }
}

impl fmt::Display for ClockReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
