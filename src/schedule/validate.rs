//! structural checks for schedules before they are stored

use serde::Serialize;

use super::time::{parse_iso_date, parse_time};
use super::types::{PromotionSchedule, ScheduleType, TimePeriod};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// check one period; `owner` names the day or date it belongs to
fn check_period(owner: &str, index: usize, period: &TimePeriod, errors: &mut Vec<String>) {
    let n = index + 1;
    if period.start_time.trim().is_empty() || period.end_time.trim().is_empty() {
        errors.push(format!(
            "{}: time period {} needs both a start and an end time",
            owner, n
        ));
        return;
    }

    let mut parsed = true;
    for t in [&period.start_time, &period.end_time] {
        if let Err(e) = parse_time(t) {
            errors.push(format!("{}: time period {}: {}", owner, n, e));
            parsed = false;
        }
    }

    if parsed && period.start_time == period.end_time && !period.range().is_full_day() {
        errors.push(format!(
            "{}: time period {} starts and ends at {}",
            owner, n, period.start_time
        ));
    }
}

/// structural validation; never fails, collects every problem found
pub fn validate_schedule(schedule: &PromotionSchedule) -> ScheduleValidation {
    let mut errors = Vec::new();

    match schedule.schedule_type {
        None => errors.push("Schedule type is required".to_string()),
        Some(ScheduleType::Unknown) => errors.push("Schedule type is not recognised".to_string()),
        Some(ScheduleType::AlwaysOn) | Some(ScheduleType::BlackoutDates) => {}
        Some(ScheduleType::SpecificDaysAndTimes) => {
            let days = schedule.days();
            if days.is_empty() {
                errors.push("At least one day must be configured".to_string());
            }

            for day in days {
                if day.weekday().is_none() {
                    errors.push(format!("'{}' is not a day of the week", day.day));
                }
                if !day.enabled {
                    continue;
                }
                if day.time_periods.is_empty() {
                    errors.push(format!("{} has no time periods", day.day));
                }
                for (i, period) in day.time_periods.iter().enumerate() {
                    check_period(&day.day, i, period, &mut errors);
                }
            }
        }
        Some(ScheduleType::SpecificDates) => {
            let dates = schedule.dates();
            if dates.is_empty() {
                errors.push("At least one date must be configured".to_string());
            }

            for entry in dates {
                if parse_iso_date(&entry.date).is_none() {
                    errors.push(format!("'{}' is not a valid date (YYYY-MM-DD)", entry.date));
                }
                for (i, period) in entry.time_periods.iter().enumerate() {
                    check_period(&entry.date, i, period, &mut errors);
                }
            }
        }
    }

    for date in schedule.blackout_dates() {
        if parse_iso_date(date).is_none() {
            errors.push(format!(
                "blackout date '{}' is not a valid date (YYYY-MM-DD)",
                date
            ));
        }
    }

    ScheduleValidation {
        valid: errors.is_empty(),
        errors,
    }
}
