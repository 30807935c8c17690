//! temporal promotion schedules
//!
//! a [`PromotionSchedule`] says when a promotion may be offered. every
//! evaluation takes "now" as an explicit local date-time; nothing here
//! reads the system clock.

mod describe;
mod eval;
mod time;
mod types;
mod validate;

pub use describe::{promotion_coverage, schedule_description};
pub use eval::{
    is_active_on_days_and_times, is_active_on_specific_date, is_blackout_date,
    is_promotion_active_now, is_time_in_period, next_available_time,
};
pub use time::{
    iso_date, minutes_of_day, minutes_to_time, parse_iso_date, parse_time, parse_weekday,
    time_to_minutes, weekday_abbrev, TimeParseError, TimeRange, MINUTES_PER_DAY,
};
pub use types::{DaySchedule, PromotionSchedule, ScheduleType, SpecificDate, TimePeriod};
pub use validate::{validate_schedule, ScheduleValidation};
