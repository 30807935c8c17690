//! human-readable summaries and weekly coverage

use super::time::{parse_weekday, weekday_abbrev, MINUTES_PER_DAY};
use super::types::{DaySchedule, PromotionSchedule, ScheduleType};

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

fn day_abbrev(day: &DaySchedule) -> String {
    match parse_weekday(&day.day) {
        Some(wd) => weekday_abbrev(wd).to_string(),
        None => day.day.chars().take(3).collect(),
    }
}

fn describe_days(days: &[DaySchedule]) -> String {
    let enabled: Vec<&DaySchedule> = days.iter().filter(|d| d.enabled).collect();
    if enabled.is_empty() {
        return "No days selected".to_string();
    }

    let names: Vec<String> = enabled.iter().map(|d| day_abbrev(d)).collect();

    let mut times: Vec<String> = Vec::new();
    for period in enabled.iter().flat_map(|d| d.time_periods.iter()) {
        let label = period.label();
        if !times.contains(&label) {
            times.push(label);
        }
    }

    if times.is_empty() {
        names.join(", ")
    } else {
        format!("{}: {}", names.join(", "), times.join(", "))
    }
}

/// one-line summary of a schedule
pub fn schedule_description(schedule: Option<&PromotionSchedule>) -> String {
    let Some(schedule) = schedule else {
        return "Always available".to_string();
    };

    match schedule.schedule_type {
        Some(ScheduleType::AlwaysOn) => "Always available".to_string(),
        Some(ScheduleType::SpecificDaysAndTimes) => {
            let days = schedule.days();
            if days.is_empty() {
                "Always available".to_string()
            } else {
                describe_days(days)
            }
        }
        Some(ScheduleType::SpecificDates) => {
            plural(schedule.dates().len(), "specific date", "specific dates")
        }
        Some(ScheduleType::BlackoutDates) => plural(
            schedule.blackout_dates().len(),
            "blackout date",
            "blackout dates",
        ),
        Some(ScheduleType::Unknown) | None => "Custom schedule".to_string(),
    }
}

/// percent of an average day the schedule is active, 0-100
///
/// only days-and-times schedules are measured; everything else is 100
pub fn promotion_coverage(schedule: Option<&PromotionSchedule>) -> u8 {
    let Some(schedule) = schedule else {
        return 100;
    };
    if schedule.schedule_type != Some(ScheduleType::SpecificDaysAndTimes) {
        return 100;
    }
    let Some(days) = &schedule.days_of_week else {
        return 100;
    };

    let weekly_minutes: u64 = days
        .iter()
        .filter(|d| d.enabled)
        .flat_map(|d| d.time_periods.iter())
        .map(|p| u64::from(p.range().duration()))
        .sum();

    let average_per_day = weekly_minutes as f64 / 7.0;
    let percent = (average_per_day / f64::from(MINUTES_PER_DAY) * 100.0).round();

    percent.clamp(0.0, 100.0) as u8
}
