//! schedule evaluation at an explicit instant
//!
//! every function takes "now" from the caller as a wall-clock
//! `NaiveDateTime` already in the schedule's timezone

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};

use super::time::{iso_date, minutes_of_day, minutes_to_time, time_to_minutes, TimeRange};
use super::types::{DaySchedule, PromotionSchedule, ScheduleType, SpecificDate, TimePeriod};

/// days searched forward by [`next_available_time`], today included
const SEARCH_DAYS: i64 = 7;

/// check if `now` falls inside the "HH:mm" window `start`-`end`
pub fn is_time_in_period(start: &str, end: &str, now: NaiveTime) -> bool {
    TimeRange::from_strs(start, end).contains(minutes_of_day(now))
}

fn any_period_active(periods: &[TimePeriod], now: NaiveTime) -> bool {
    periods
        .iter()
        .any(|p| is_time_in_period(&p.start_time, &p.end_time, now))
}

/// check if the calendar date of `now` is listed
pub fn is_blackout_date(dates: &[String], now: &NaiveDateTime) -> bool {
    let today = iso_date(now);
    dates.iter().any(|d| d.trim() == today)
}

fn day_entry<'a>(days: &'a [DaySchedule], date: &NaiveDateTime) -> Option<&'a DaySchedule> {
    let weekday = date.weekday();
    days.iter().find(|d| d.weekday() == Some(weekday))
}

/// active when today's entry is enabled and one of its periods covers now
pub fn is_active_on_days_and_times(days: &[DaySchedule], now: &NaiveDateTime) -> bool {
    match day_entry(days, now) {
        Some(day) if day.enabled => any_period_active(&day.time_periods, now.time()),
        _ => false,
    }
}

/// active when today's date is listed and one of its periods covers now
pub fn is_active_on_specific_date(dates: &[SpecificDate], now: &NaiveDateTime) -> bool {
    let today = iso_date(now);
    match dates.iter().find(|d| d.date.trim() == today) {
        Some(entry) => any_period_active(&entry.time_periods, now.time()),
        None => false,
    }
}

/// whether a promotion with this schedule is available at `now`
///
/// no schedule means always available. a blackout date wins over
/// everything else. unknown types are treated as available.
pub fn is_promotion_active_now(schedule: Option<&PromotionSchedule>, now: &NaiveDateTime) -> bool {
    let Some(schedule) = schedule else {
        return true;
    };

    let blackout = schedule.blackout_dates();
    if !blackout.is_empty() && is_blackout_date(blackout, now) {
        return false;
    }

    match schedule.schedule_type {
        Some(ScheduleType::AlwaysOn) => true,
        Some(ScheduleType::SpecificDaysAndTimes) => {
            let days = schedule.days();
            // nothing configured yet, not restricted
            days.is_empty() || is_active_on_days_and_times(days, now)
        }
        Some(ScheduleType::SpecificDates) => {
            let dates = schedule.dates();
            !dates.is_empty() && is_active_on_specific_date(dates, now)
        }
        Some(ScheduleType::BlackoutDates) => !is_blackout_date(blackout, now),
        Some(ScheduleType::Unknown) | None => {
            tracing::debug!(
                schedule_type = ?schedule.schedule_type,
                "unrecognised schedule type, treating as active"
            );
            true
        }
    }
}

/// the next instant a days-and-times schedule turns on
///
/// today only counts periods starting later than now, in declared order.
/// later days use their first period. `None` for other schedule types,
/// for unrestricted schedules, and when nothing starts within a week.
pub fn next_available_time(
    schedule: Option<&PromotionSchedule>,
    now: &NaiveDateTime,
) -> Option<NaiveDateTime> {
    let schedule = schedule?;
    if schedule.schedule_type != Some(ScheduleType::SpecificDaysAndTimes) {
        return None;
    }

    let days = schedule.days();
    if days.is_empty() {
        return None;
    }

    let current = minutes_of_day(now.time());

    for days_ahead in 0..SEARCH_DAYS {
        let candidate = *now + Duration::days(days_ahead);
        let Some(day) = day_entry(days, &candidate) else {
            continue;
        };
        if !day.enabled {
            continue;
        }

        if days_ahead == 0 {
            let later_today = day
                .time_periods
                .iter()
                .map(|p| time_to_minutes(&p.start_time))
                .filter(|start| *start > current)
                .find_map(minutes_to_time);

            if let Some(start) = later_today {
                return Some(candidate.date().and_time(start));
            }
        } else if let Some(first) = day.time_periods.first() {
            if let Some(start) = minutes_to_time(time_to_minutes(&first.start_time)) {
                return Some(candidate.date().and_time(start));
            }
        }
    }

    None
}
