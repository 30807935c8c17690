// integration tests for the config command

use crate::common::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_path_respects_env_and_flag() {
    let dir = TempDir::new().unwrap();
    let env_path = dir.path().join("config.json");

    let output = run_fleetrule(&dir, &["--no-json", "config", "path"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), path_str(&env_path));

    let flag_path = dir.path().join("other.json");
    let output = run_fleetrule(
        &dir,
        &["--no-json", "--config", path_str(&flag_path), "config", "path"],
    );
    assert_eq!(stdout(&output).trim(), path_str(&flag_path));
}

#[test]
fn test_config_show_missing_file_shows_defaults() {
    let dir = TempDir::new().unwrap();

    let output = run_fleetrule(&dir, &["--no-json", "config", "show"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["contexts"], serde_json::json!([]));
    // reading never creates the file
    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn test_config_reset_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", r#"{ "settings": { "timezone": "UTC" } }"#);

    let output = run_fleetrule(&dir, &["--no-json", "config", "reset"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let content = fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(json["settings"].get("timezone").is_none());
}

#[test]
fn test_config_default_verifies_clean() {
    let dir = TempDir::new().unwrap();

    let output = run_fleetrule(&dir, &["--no-json", "config", "default"]);
    assert!(output.status.success());
    write_file(&dir, "config.json", &stdout(&output));

    let output = run_fleetrule(&dir, &["--no-json", "config", "verify"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(stdout(&output).contains("Configuration is valid"));
}

#[test]
fn test_config_verify_reports_errors() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "config.json",
        r#"{
            // two contexts with the same id
            contexts: [
                { id: "dup", name: "One" },
                { id: "dup", name: "Two" },
            ],
        }"#,
    );

    let output = run_fleetrule(&dir, &["--json", "config", "verify"]);
    assert_eq!(output.status.code(), Some(3));

    let json = json_response(&output);
    assert_eq!(json["error"]["code"], -32003);
    assert!(json["error"]["data"]["details"][0]
        .as_str()
        .unwrap()
        .contains("duplicate context id 'dup'"));
}

#[test]
fn test_config_verify_missing_file() {
    let dir = TempDir::new().unwrap();

    let output = run_fleetrule(&dir, &["--no-json", "config", "verify"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("config file not found"));
}

#[test]
fn test_broken_config_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "config.json", "{ contexts: [");

    let output = run_fleetrule(&dir, &["--json", "contexts"]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(json_response(&output)["error"]["code"], -32003);
}
