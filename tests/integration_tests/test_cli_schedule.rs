// integration tests for the schedule command

use crate::common::*;
use tempfile::TempDir;

// 2026-03-04 is a Wednesday
const EVENINGS: &str = r#"{
    "type": "specific-days-and-times",
    "daysOfWeek": [
        { "day": "Wednesday", "enabled": true, "timePeriods": [{ "startTime": "18:00", "endTime": "23:00" }] },
        { "day": "Friday", "enabled": true, "timePeriods": [{ "startTime": "22:00", "endTime": "02:00" }] }
    ],
    "blackoutDates": ["2026-03-11"],
    "timezone": "Europe/London"
}"#;

fn run_schedule(dir: &TempDir, args: &[&str]) -> std::process::Output {
    let mut full = vec!["--json", "schedule"];
    full.extend_from_slice(args);
    run_fleetrule(dir, &full)
}

#[test]
fn test_schedule_active_inside_window() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", EVENINGS);

    let output = run_schedule(&dir, &["active", path_str(&file), "--at", "2026-03-04T19:15"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let json = json_response(&output);
    assert_eq!(json["result"]["active"], true);
    assert_eq!(json["result"]["at"], "2026-03-04T19:15:00");
    assert_eq!(json["result"]["timezone"], "Europe/London");
}

#[test]
fn test_schedule_active_outside_window_and_on_blackout() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", EVENINGS);

    let output = run_schedule(&dir, &["active", path_str(&file), "--at", "2026-03-04T17:59"]);
    assert_eq!(json_response(&output)["result"]["active"], false);

    // the following Wednesday is blacked out
    let output = run_schedule(&dir, &["active", path_str(&file), "--at", "2026-03-11T19:00"]);
    assert_eq!(json_response(&output)["result"]["active"], false);
}

#[test]
fn test_schedule_active_overnight_period() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", EVENINGS);

    // the Friday 22:00-02:00 window is matched by the current weekday only
    let output = run_schedule(&dir, &["active", path_str(&file), "--at", "2026-03-06T23:30"]);
    assert_eq!(json_response(&output)["result"]["active"], true);

    let output = run_schedule(&dir, &["active", path_str(&file), "--at", "2026-03-06T01:00"]);
    assert_eq!(json_response(&output)["result"]["active"], true);
}

#[test]
fn test_schedule_active_text_output() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", r#"{ "type": "always-on" }"#);

    let output = run_fleetrule(
        &dir,
        &["--no-json", "schedule", "active", path_str(&file), "--at", "2026-03-04T03:00"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "active at 2026-03-04T03:00:00");
}

#[test]
fn test_schedule_active_bad_at() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", EVENINGS);

    let output = run_schedule(&dir, &["active", path_str(&file), "--at", "next tuesday"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json_response(&output)["error"]["code"], -32002);
}

#[test]
fn test_schedule_describe_and_coverage() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", EVENINGS);

    let output = run_schedule(&dir, &["describe", path_str(&file)]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    let json = json_response(&output);
    assert_eq!(
        json["result"]["description"],
        "Wed, Fri: 18:00-23:00, 22:00-02:00"
    );
    // (300 + 240) / 7 / 1440 = 5.4%
    assert_eq!(json["result"]["coverage"], 5);

    let output = run_fleetrule(
        &dir,
        &["--no-json", "schedule", "coverage", path_str(&file)],
    );
    assert_eq!(stdout(&output).trim(), "5");
}

#[test]
fn test_schedule_next_later_today_and_next_week() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", EVENINGS);

    let output = run_schedule(&dir, &["next", path_str(&file), "--at", "2026-03-04T09:00"]);
    assert_eq!(json_response(&output)["result"]["next"], "2026-03-04T18:00:00");

    // after Wednesday's start, Friday is next
    let output = run_schedule(&dir, &["next", path_str(&file), "--at", "2026-03-04T18:30"]);
    assert_eq!(json_response(&output)["result"]["next"], "2026-03-06T22:00:00");
}

#[test]
fn test_schedule_next_none_for_other_types() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", r#"{ "type": "always-on" }"#);

    let output = run_schedule(&dir, &["next", path_str(&file), "--at", "2026-03-04T09:00"]);
    assert!(output.status.success());
    assert!(json_response(&output)["result"]["next"].is_null());
}

#[test]
fn test_schedule_validate() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", EVENINGS);

    let output = run_schedule(&dir, &["validate", path_str(&file)]);
    assert!(output.status.success(), "stdout={}", stdout(&output));
    assert_eq!(json_response(&output)["result"]["valid"], true);

    let bad = write_file(
        &dir,
        "bad.json",
        r#"{ "type": "specific-days-and-times",
             "daysOfWeek": [{ "day": "Monday", "enabled": true, "timePeriods": [] }] }"#,
    );
    let output = run_schedule(&dir, &["validate", path_str(&bad)]);
    assert_eq!(output.status.code(), Some(6));
    let json = json_response(&output);
    assert_eq!(json["error"]["code"], -32006);
    assert!(json["error"]["data"]["details"][0]
        .as_str()
        .unwrap()
        .contains("Monday"));
}

#[test]
fn test_schedule_invalid_json() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "promo.json", "[1, 2");

    let output = run_fleetrule(&dir, &["--no-json", "schedule", "describe", path_str(&file)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid schedule"));
}
