// integration tests for compile, eval, check-expr, operators and contexts

use crate::common::*;
use tempfile::TempDir;

const AIRPORT_DRAFT: &str = r#"{
    "context": "booking_event",
    "conditions": [
        { "variable": "booking.fare", "operator": ">", "value": 50, "logicalOperator": "&&" },
        { "variable": "booking.isAirport", "operator": "==", "value": true }
    ]
}"#;

// ============================================================================
// compile tests
// ============================================================================

#[test]
fn test_compile_prints_expression() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(&dir, "rule.json", AIRPORT_DRAFT);

    let output = run_fleetrule(&dir, &["--no-json", "compile", path_str(&draft)]);

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(
        stdout(&output).trim(),
        "booking.fare > 50 && booking.isAirport == true"
    );
}

#[test]
fn test_compile_json_output() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(&dir, "rule.json", AIRPORT_DRAFT);

    let output = run_fleetrule(&dir, &["--json", "compile", path_str(&draft)]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let json = json_response(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["context"], "booking_event");
    assert_eq!(json["result"]["valid"], true);
    assert_eq!(
        json["result"]["expression"],
        "booking.fare > 50 && booking.isAirport == true"
    );
}

#[test]
fn test_compile_reports_disallowed_operator() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(
        &dir,
        "rule.json",
        r#"{ "conditions": [{ "variable": "booking.status", "operator": "contains", "value": "pend" }] }"#,
    );

    let output = run_fleetrule(
        &dir,
        &["--json", "compile", path_str(&draft), "--context", "booking_event"],
    );

    assert_eq!(output.status.code(), Some(5));
    let json = json_response(&output);
    assert_eq!(json["result"]["valid"], false);
    assert_eq!(
        json["result"]["expression"],
        "booking.status.includes(\"pend\")"
    );
    assert!(json["result"]["error"]
        .as_str()
        .unwrap()
        .contains("not allowed"));
}

#[test]
fn test_compile_unknown_variable_suggests() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(
        &dir,
        "rule.json",
        r#"{ "context": "booking_event", "conditions": [{ "variable": "booking.fair", "operator": ">", "value": 10 }] }"#,
    );

    let output = run_fleetrule(&dir, &["--json", "compile", path_str(&draft)]);

    assert_eq!(output.status.code(), Some(5));
    let json = json_response(&output);
    // the unresolved condition still compiles, to `true`
    assert_eq!(json["result"]["expression"], "true");
    assert_eq!(json["result"]["unresolved"][0]["variable"], "booking.fair");
    assert_eq!(
        json["result"]["unresolved"][0]["suggestions"][0],
        "booking.fare"
    );
}

#[test]
fn test_compile_unknown_context() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(&dir, "rule.json", AIRPORT_DRAFT);

    let output = run_fleetrule(
        &dir,
        &["--json", "compile", path_str(&draft), "--context", "booking_evnt"],
    );

    assert_eq!(output.status.code(), Some(4));
    let json = json_response(&output);
    assert_eq!(json["error"]["code"], -32004);
    assert_eq!(json["error"]["data"]["suggestions"][0], "booking_event");
}

#[test]
fn test_compile_without_context_fails() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(&dir, "rule.json", r#"{ "conditions": [] }"#);

    let output = run_fleetrule(&dir, &["--no-json", "compile", path_str(&draft)]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("no rule context given"));
}

#[test]
fn test_compile_uses_default_context_from_config() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "config.json",
        r#"{ settings: { default_context: "promotion_targeting" } }"#,
    );
    let draft = write_file(
        &dir,
        "rule.json",
        r#"{ "conditions": [{ "variable": "customer.isNew", "operator": "==", "value": "true" }] }"#,
    );

    let output = run_fleetrule(&dir, &["--json", "compile", path_str(&draft)]);

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let json = json_response(&output);
    assert_eq!(json["result"]["context"], "promotion_targeting");
    assert_eq!(json["result"]["expression"], "customer.isNew == true");
}

#[test]
fn test_compile_invalid_draft_json() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(&dir, "rule.json", "{ not json");

    let output = run_fleetrule(&dir, &["--no-json", "compile", path_str(&draft)]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid rule draft"));
}

// ============================================================================
// eval tests
// ============================================================================

#[test]
fn test_eval_matches_facts() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(&dir, "rule.json", AIRPORT_DRAFT);
    let facts = write_file(
        &dir,
        "facts.json",
        r#"{ "booking": { "fare": 72.5, "isAirport": true } }"#,
    );

    let output = run_fleetrule(
        &dir,
        &["--json", "eval", path_str(&draft), "--facts", path_str(&facts)],
    );

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let json = json_response(&output);
    assert_eq!(json["result"]["matched"], true);
    assert_eq!(json["result"]["facts"], 2);
    assert_eq!(
        json["result"]["variables"],
        serde_json::json!(["booking.fare", "booking.isAirport"])
    );
}

#[test]
fn test_eval_or_group() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(
        &dir,
        "rule.json",
        r#"{
            "context": "booking_event",
            "conditions": [
                { "variable": "booking.fare", "operator": ">", "value": 100, "logicalOperator": "||" },
                { "variable": "booking.pickupZone", "operator": "in", "value": ["LHR", "LGW"] }
            ]
        }"#,
    );
    let facts = write_file(
        &dir,
        "facts.json",
        r#"{ "booking": { "fare": 20, "pickupZone": "LGW" } }"#,
    );

    let output = run_fleetrule(
        &dir,
        &["--no-json", "eval", path_str(&draft), "--facts", path_str(&facts)],
    );

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "true");
}

#[test]
fn test_eval_missing_fact_is_false() {
    let dir = TempDir::new().unwrap();
    let draft = write_file(&dir, "rule.json", AIRPORT_DRAFT);
    let facts = write_file(&dir, "facts.json", r#"{ "booking": { "fare": 90 } }"#);

    let output = run_fleetrule(
        &dir,
        &["--no-json", "eval", path_str(&draft), "--facts", path_str(&facts)],
    );

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "false");
}

// ============================================================================
// check-expr, operators, contexts
// ============================================================================

#[test]
fn test_check_expr_valid_and_invalid() {
    let dir = TempDir::new().unwrap();

    let output = run_fleetrule(&dir, &["--json", "check-expr", "(a > 1) && b == \"x\""]);
    assert!(output.status.success());
    assert_eq!(json_response(&output)["result"]["valid"], true);

    let output = run_fleetrule(&dir, &["--json", "check-expr", "(a > 1"]);
    assert_eq!(output.status.code(), Some(5));
    assert_eq!(
        json_response(&output)["error"]["message"],
        "Unbalanced parentheses"
    );

    let output = run_fleetrule(&dir, &["--no-json", "check-expr", "a == 'x"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("Unclosed quote"));
}

#[test]
fn test_operators_for_types() {
    let dir = TempDir::new().unwrap();

    let output = run_fleetrule(&dir, &["--no-json", "operators", "boolean"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "==\n!=\n");

    let output = run_fleetrule(&dir, &["--json", "operators", "array"]);
    let json = json_response(&output);
    assert_eq!(json["result"]["type"], "array");
    assert_eq!(json["result"]["operators"], serde_json::json!(["contains", "in_list"]));

    // unrecognised types still get equality
    let output = run_fleetrule(&dir, &["--json", "operators", "geometry"]);
    assert_eq!(
        json_response(&output)["result"]["operators"],
        serde_json::json!(["==", "!="])
    );
}

#[test]
fn test_contexts_list_includes_builtins_and_custom() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "config.json",
        r#"{ "contexts": [{ "id": "fleet_alert", "name": "Fleet alert", "variables": [
            { "id": "vehicle.mileage", "name": "Mileage", "type": "number" }
        ] }] }"#,
    );

    let output = run_fleetrule(&dir, &["--json", "contexts"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let json = json_response(&output);
    let ids: Vec<&str> = json["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"booking_event"));
    assert!(ids.contains(&"promotion_targeting"));
    assert!(ids.contains(&"fleet_alert"));
}

#[test]
fn test_contexts_show_one() {
    let dir = TempDir::new().unwrap();

    let output = run_fleetrule(&dir, &["--json", "contexts", "booking_event"]);
    assert!(output.status.success());
    let json = json_response(&output);
    assert_eq!(json["result"]["id"], "booking_event");
    assert!(json["result"]["variables"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v["id"] == "booking.fare"));

    let output = run_fleetrule(&dir, &["--no-json", "contexts", "webhok_event"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("webhook_event"));
}
