// shared utilities for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// path to the fleetrule binary cargo built for this test run
pub fn fleetrule_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fleetrule"))
}

/// run fleetrule with an isolated config location
///
/// FLEETRULE_CONFIG points into `dir` so tests never read the user's config
pub fn run_fleetrule(dir: &TempDir, args: &[&str]) -> Output {
    let config = dir.path().join("config.json");
    run_fleetrule_with_env(args, &[("FLEETRULE_CONFIG", config.to_str().unwrap())])
}

/// run fleetrule command with custom environment
pub fn run_fleetrule_with_env(args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(fleetrule_binary_path());
    cmd.args(args);
    cmd.env_remove("RUST_LOG");

    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    cmd.output().expect("Failed to run fleetrule")
}

/// write `content` to `name` inside the temp dir
pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not utf-8")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// parse a JSON-RPC response from stdout
pub fn json_response(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): stdout={}, stderr={}",
            e,
            stdout(output),
            stderr(output)
        )
    })
}
