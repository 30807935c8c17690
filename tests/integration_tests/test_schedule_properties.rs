// property tests for time windows and coverage

use fleetrule::schedule::{
    promotion_coverage, DaySchedule, PromotionSchedule, TimePeriod, TimeRange, MINUTES_PER_DAY,
};
use proptest::prelude::*;

const WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn period() -> impl Strategy<Value = TimePeriod> {
    (0..MINUTES_PER_DAY, 0..MINUTES_PER_DAY).prop_map(|(s, e)| TimePeriod::new(hhmm(s), hhmm(e)))
}

fn day() -> impl Strategy<Value = DaySchedule> {
    (
        0..WEEK.len(),
        any::<bool>(),
        prop::collection::vec(period(), 0..4),
    )
        .prop_map(|(i, enabled, periods)| DaySchedule::new(WEEK[i], enabled, periods))
}

proptest! {
    #[test]
    fn prop_contains_agrees_with_duration(start in 0..MINUTES_PER_DAY, end in 0..MINUTES_PER_DAY) {
        let range = TimeRange::new(start, end);
        let covered = (0..MINUTES_PER_DAY).filter(|m| range.contains(*m)).count() as u32;
        prop_assert_eq!(covered, range.duration());
    }

    #[test]
    fn prop_start_minute_is_inside_unless_empty(start in 0..MINUTES_PER_DAY, end in 0..MINUTES_PER_DAY) {
        let range = TimeRange::new(start, end);
        prop_assert_eq!(range.contains(start), range.duration() > 0);
    }

    #[test]
    fn prop_coverage_is_a_percentage(days in prop::collection::vec(day(), 0..10)) {
        let schedule = PromotionSchedule::days_and_times(days);
        prop_assert!(promotion_coverage(Some(&schedule)) <= 100);
    }

    #[test]
    fn prop_disabled_days_cover_nothing(periods in prop::collection::vec(period(), 1..4)) {
        let days = WEEK
            .iter()
            .map(|d| DaySchedule::new(*d, false, periods.clone()))
            .collect();
        let schedule = PromotionSchedule::days_and_times(days);
        prop_assert_eq!(promotion_coverage(Some(&schedule)), 0);
    }
}
