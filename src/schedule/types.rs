//! promotion schedule model
//!
//! the JSON shape authoring surfaces store:
//!
//! ```json
//! {
//!   "type": "specific-days-and-times",
//!   "daysOfWeek": [
//!     { "day": "Friday", "enabled": true, "timePeriods": [{ "startTime": "18:00", "endTime": "23:00" }] }
//!   ],
//!   "blackoutDates": ["2026-12-25"],
//!   "timezone": "Europe/London"
//! }
//! ```

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::time::{parse_weekday, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleType {
    AlwaysOn,
    SpecificDaysAndTimes,
    SpecificDates,
    BlackoutDates,
    /// a type this crate doesn't recognise
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePeriod {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl TimePeriod {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// the whole-day period "00:00"-"00:00"
    pub fn full_day() -> Self {
        Self::new("00:00", "00:00")
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::from_strs(&self.start_time, &self.end_time)
    }

    /// "HH:mm-HH:mm"
    pub fn label(&self) -> String {
        format!("{}-{}", self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// weekday name, "Monday" or "mon"
    pub day: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub time_periods: Vec<TimePeriod>,
}

impl DaySchedule {
    pub fn new(day: impl Into<String>, enabled: bool, time_periods: Vec<TimePeriod>) -> Self {
        Self {
            day: day.into(),
            enabled,
            time_periods,
        }
    }

    pub fn weekday(&self) -> Option<Weekday> {
        parse_weekday(&self.day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificDate {
    /// "YYYY-MM-DD"
    pub date: String,
    #[serde(default)]
    pub time_periods: Vec<TimePeriod>,
}

impl SpecificDate {
    pub fn new(date: impl Into<String>, time_periods: Vec<TimePeriod>) -> Self {
        Self {
            date: date.into(),
            time_periods,
        }
    }
}

/// when a promotion is available
///
/// `blackout_dates` applies to every type and beats every other rule.
/// `timezone` is carried for display; callers pass "now" already in that zone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionSchedule {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<ScheduleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<DaySchedule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_dates: Option<Vec<SpecificDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blackout_dates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl PromotionSchedule {
    pub fn always_on() -> Self {
        Self {
            schedule_type: Some(ScheduleType::AlwaysOn),
            ..Self::default()
        }
    }

    pub fn days_and_times(days: Vec<DaySchedule>) -> Self {
        Self {
            schedule_type: Some(ScheduleType::SpecificDaysAndTimes),
            days_of_week: Some(days),
            ..Self::default()
        }
    }

    pub fn on_dates(dates: Vec<SpecificDate>) -> Self {
        Self {
            schedule_type: Some(ScheduleType::SpecificDates),
            specific_dates: Some(dates),
            ..Self::default()
        }
    }

    pub fn blackout(dates: Vec<String>) -> Self {
        Self {
            schedule_type: Some(ScheduleType::BlackoutDates),
            blackout_dates: Some(dates),
            ..Self::default()
        }
    }

    pub fn with_blackout_dates(mut self, dates: Vec<String>) -> Self {
        self.blackout_dates = Some(dates);
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn blackout_dates(&self) -> &[String] {
        self.blackout_dates.as_deref().unwrap_or(&[])
    }

    pub fn days(&self) -> &[DaySchedule] {
        self.days_of_week.as_deref().unwrap_or(&[])
    }

    pub fn dates(&self) -> &[SpecificDate] {
        self.specific_dates.as_deref().unwrap_or(&[])
    }

    /// parse a schedule from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
