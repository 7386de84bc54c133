//! Clock-time parsing and duration arithmetic
//!
//! Two flavours live here. The lenient functions (`parse_time_to_minutes`,
//! `calculate_duration`) never fail: malformed tokens degrade to a best-effort
//! number. `TimeOfDay` is the strict counterpart for callers that want to
//! reject bad input instead.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Minutes in a day; the overnight wrap adds this once.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Minute-of-day for 12:00 PM.
pub const NOON_MINUTES: i32 = 12 * 60;

static NOON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)noon").unwrap());

static STRICT_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{1,2})(?::(\d{1,2}))?\s*(a\.?m\.?|p\.?m\.?)?$").unwrap()
});

/// Parse a free-form clock time ("3:15 AM", "5 PM", "noon", "17:30") into
/// minutes since midnight.
///
/// Never fails. Non-numeric hour or minute fragments count as zero, and a
/// token without AM/PM is taken as a 24-hour literal without range checks,
/// so `"25"` yields `1500`.
pub fn parse_time_to_minutes(text: &str) -> i32 {
    let upper = text.trim().to_uppercase();
    if upper.contains("NOON") {
        return NOON_MINUTES;
    }

    let compact: String = upper.chars().filter(|c| !c.is_whitespace()).collect();
    let is_pm = compact.contains("PM") || compact.contains("P.M.");
    let is_am = compact.contains("AM") || compact.contains("A.M.");

    let digits: String = compact
        .replace("P.M.", "")
        .replace("A.M.", "")
        .replace("PM", "")
        .replace("AM", "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ':')
        .collect();

    let (hour, minute) = match digits.split_once(':') {
        Some((h, rest)) => {
            let m = rest.split(':').next().unwrap_or("");
            (h.parse::<i32>().unwrap_or(0), m.parse::<i32>().unwrap_or(0))
        }
        None => (digits.parse::<i32>().unwrap_or(0), 0),
    };

    // Absurd hour tokens saturate instead of overflowing
    let mut total = hour.saturating_mul(60).saturating_add(minute);
    if is_pm && hour < 12 {
        total = total.saturating_add(NOON_MINUTES);
    }
    if is_am && hour == 12 {
        total = total.saturating_sub(NOON_MINUTES);
    }

    debug!("Parsed time token '{}' -> {} minutes", text, total);
    total
}

/// Elapsed minutes from `start` to `end`, assuming the event crosses
/// midnight at most once.
pub fn calculate_duration(start: &str, end: &str) -> i32 {
    let start = NOON_RE.replace_all(start, "12:00 PM");
    let end = NOON_RE.replace_all(end, "12:00 PM");

    let start_minutes = parse_time_to_minutes(&start);
    let end_minutes = parse_time_to_minutes(&end);

    let mut duration = end_minutes.saturating_sub(start_minutes);
    if duration < 0 {
        duration = duration.saturating_add(MINUTES_PER_DAY);
    }

    debug!("Duration '{}' -> '{}' = {} minutes", start, end, duration);
    duration
}

/// Errors produced by strict time parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    #[error("Time is empty")]
    Empty,
    #[error("Invalid hour in time '{0}'")]
    InvalidHour(String),
    #[error("Invalid minute in time '{0}'")]
    InvalidMinute(String),
    #[error("Time '{0}' is outside 00:00-23:59")]
    OutOfRange(String),
}

/// A validated minute of the day in `[0, 1439]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const NOON: TimeOfDay = TimeOfDay(NOON_MINUTES as u16);

    /// Build from minutes since midnight, rejecting anything past 23:59.
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        if (0..MINUTES_PER_DAY).contains(&minutes) {
            Some(TimeOfDay(minutes as u16))
        } else {
            None
        }
    }

    pub fn minutes(self) -> i32 {
        i32::from(self.0)
    }

    /// Strict parse of "H", "H:MM", optionally with AM/PM, or "noon"/"midnight".
    pub fn parse(text: &str) -> Result<Self, TimeError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TimeError::Empty);
        }

        match trimmed.to_lowercase().as_str() {
            "noon" => return Ok(Self::NOON),
            "midnight" => return Ok(Self::MIDNIGHT),
            _ => {}
        }

        let caps = STRICT_TIME_RE
            .captures(trimmed)
            .ok_or_else(|| TimeError::InvalidHour(trimmed.to_string()))?;

        let hour: i32 = caps[1]
            .parse()
            .map_err(|_| TimeError::InvalidHour(trimmed.to_string()))?;
        let minute: i32 = match caps.get(2) {
            Some(m) if m.as_str().len() == 2 => m
                .as_str()
                .parse()
                .map_err(|_| TimeError::InvalidMinute(trimmed.to_string()))?,
            Some(_) => return Err(TimeError::InvalidMinute(trimmed.to_string())),
            None => 0,
        };
        if minute >= 60 {
            return Err(TimeError::InvalidMinute(trimmed.to_string()));
        }

        let meridiem = caps.get(3).map(|m| m.as_str().to_lowercase());
        let hour_24 = match meridiem.as_deref().map(|m| m.starts_with('p')) {
            Some(is_pm) => {
                if hour == 0 || hour > 12 {
                    return Err(TimeError::InvalidHour(trimmed.to_string()));
                }
                match (hour, is_pm) {
                    (12, false) => 0,
                    (12, true) => 12,
                    (h, true) => h + 12,
                    (h, false) => h,
                }
            }
            None => hour,
        };

        Self::from_minutes(hour_24 * 60 + minute)
            .ok_or_else(|| TimeError::OutOfRange(trimmed.to_string()))
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::format::format_minutes_of_day(self.minutes()))
    }
}
