use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{DispatchError, DispatchResult};

const FORMAT: &str = "%H:%M";

/// A 24h "HH:MM" time of day. Ordering is plain clock ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> DispatchResult<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| DispatchError::invalid(format!("invalid time {hour:02}:{minute:02}")))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl FromStr for TimeOfDay {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), FORMAT)
            .map(Self)
            .map_err(|e| DispatchError::invalid(format!("time {s:?} is not HH:MM: {e}")))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = DispatchError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

/// Same-day availability window, inclusive on both ends.
///
/// Windows spanning midnight (22:00 to 02:00) are rejected rather than
/// wrapped; see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct AvailabilityWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawWindow> for AvailabilityWindow {
    type Error = DispatchError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        AvailabilityWindow::new(raw.start, raw.end)
    }
}

impl AvailabilityWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> DispatchResult<Self> {
        if start > end {
            return Err(DispatchError::invalid(format!(
                "availability start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two "HH:MM" strings.
    pub fn parse(start: &str, end: &str) -> DispatchResult<Self> {
        Self::new(start.parse()?, end.parse()?)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn contains(&self, t: TimeOfDay) -> bool {
        self.start <= t && t <= self.end
    }
}
