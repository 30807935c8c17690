//! time utilities for schedules
//!
//! times are "HH:mm" 24-hour strings. evaluation uses the lenient
//! [`time_to_minutes`]; validation uses the strict [`parse_time`].
//! a window whose end is before its start runs overnight ("22:00"-"02:00").

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use regex::Regex;
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

lazy_static::lazy_static! {
    static ref TIME_PATTERN: Regex = Regex::new(r"^(\d{2}):(\d{2})$").unwrap();
}

/// why a time string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("'{0}' is not in HH:mm format")]
    Format(String),
    #[error("hour {hour} in '{input}' is out of range (00-23)")]
    Hour { input: String, hour: u32 },
    #[error("minute {minute} in '{input}' is out of range (00-59)")]
    Minute { input: String, minute: u32 },
}

/// a time window in minutes from midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

impl TimeRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// build from "HH:mm" strings without validating them
    pub fn from_strs(start: &str, end: &str) -> Self {
        Self::new(time_to_minutes(start), time_to_minutes(end))
    }

    /// "00:00"-"00:00" marks a period covering the whole day
    pub fn is_full_day(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// check if a time (in minutes from midnight) is within this range
    ///
    /// the end minute is excluded; overnight ranges wrap past midnight
    pub fn contains(&self, minutes: u32) -> bool {
        if self.is_full_day() {
            return true;
        }
        if self.is_overnight() {
            // overnight range: 22:00-06:00
            minutes >= self.start || minutes < self.end
        } else {
            // normal range: 09:00-17:00
            minutes >= self.start && minutes < self.end
        }
    }

    /// active minutes in one day
    pub fn duration(&self) -> u32 {
        if self.is_full_day() {
            MINUTES_PER_DAY
        } else if self.is_overnight() {
            MINUTES_PER_DAY
                .saturating_add(self.end)
                .saturating_sub(self.start)
        } else {
            self.end - self.start
        }
    }
}

/// "HH:mm" to minutes from midnight, no range checks
///
/// unparsable parts count as zero
pub fn time_to_minutes(s: &str) -> u32 {
    let mut parts = s.trim().splitn(2, ':');
    let hours: u32 = parts
        .next()
        .and_then(|h| h.trim().parse().ok())
        .unwrap_or(0);
    let minutes: u32 = parts
        .next()
        .and_then(|m| m.trim().parse().ok())
        .unwrap_or(0);
    hours.saturating_mul(60).saturating_add(minutes)
}

/// strict "HH:mm" parse to minutes from midnight
pub fn parse_time(s: &str) -> Result<u32, TimeParseError> {
    let caps = TIME_PATTERN
        .captures(s)
        .ok_or_else(|| TimeParseError::Format(s.to_string()))?;

    let hour: u32 = caps[1]
        .parse()
        .map_err(|_| TimeParseError::Format(s.to_string()))?;
    let minute: u32 = caps[2]
        .parse()
        .map_err(|_| TimeParseError::Format(s.to_string()))?;

    if hour >= 24 {
        return Err(TimeParseError::Hour {
            input: s.to_string(),
            hour,
        });
    }
    if minute >= 60 {
        return Err(TimeParseError::Minute {
            input: s.to_string(),
            minute,
        });
    }

    Ok(hour * 60 + minute)
}

/// minutes from midnight back to a clock time
pub fn minutes_to_time(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

pub fn minutes_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// "YYYY-MM-DD" for the calendar day of `now`
pub fn iso_date(now: &NaiveDateTime) -> String {
    now.date().format("%Y-%m-%d").to_string()
}

pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// parse a weekday from string
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.trim().to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
