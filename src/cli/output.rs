//! output formatting utilities for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}

use serde::Serialize;
use std::io::IsTerminal;

use crate::conditions::UnresolvedVariable;

/// JSON-RPC version constant
const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// JSON-RPC 2.0 success response
#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 error response
#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

/// JSON-RPC 2.0 error object
#[derive(Serialize)]
pub struct RpcError {
    /// error code (fleetrule exit code, offset by -32000 for app-specific errors)
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

/// additional error data
#[derive(Serialize, Default)]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl JsonRpcError {
    /// create error with standard JSON-RPC error code range
    /// fleetrule uses -32000 to -32099 for application errors (per JSON-RPC spec)
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: None,
            },
            id: None,
        }
    }

    pub fn with_suggestions(
        code: i32,
        message: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let mut error = Self::new(code, message);
        if !suggestions.is_empty() {
            error.error.data = Some(ErrorData {
                suggestions: Some(suggestions),
                details: None,
            });
        }
        error
    }

    /// attach the individual problems behind a summary message
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        if !details.is_empty() {
            self.error.data.get_or_insert_with(ErrorData::default).details = Some(details);
        }
        self
    }
}

/// convert fleetrule exit code to JSON-RPC error code
/// JSON-RPC reserves -32000 to -32099 for server/application errors
fn to_jsonrpc_code(exit_code: i32) -> i32 {
    -32000 - exit_code
}

/// convert JSON-RPC error code back to fleetrule exit code
#[cfg(test)]
fn from_jsonrpc_code(rpc_code: i32) -> i32 {
    -(rpc_code + 32000)
}

// ============================================================================
// Result data structures for different commands
// ============================================================================

/// result data for compile
#[derive(Serialize)]
pub struct CompileData {
    pub context: String,
    pub expression: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<UnresolvedVariable>,
}

/// result data for eval
#[derive(Serialize)]
pub struct EvalData {
    pub context: String,
    pub matched: bool,
    /// the condition tree that was interpreted
    pub condition: String,
    /// variable ids the condition reads, in first-seen order
    pub variables: Vec<String>,
    pub facts: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<UnresolvedVariable>,
}

#[derive(Serialize)]
pub struct OperatorsData {
    #[serde(rename = "type")]
    pub type_name: String,
    pub operators: Vec<String>,
}

/// one row of `contexts`
#[derive(Serialize)]
pub struct ContextSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub variables: usize,
}

/// result data for `schedule active`
#[derive(Serialize)]
pub struct ScheduleActiveData {
    pub active: bool,
    pub at: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// result data for `schedule describe`
#[derive(Serialize)]
pub struct ScheduleDescribeData {
    pub description: String,
    pub coverage: u8,
}

#[derive(Serialize)]
pub struct ScheduleCoverageData {
    pub coverage: u8,
}

/// result data for `schedule next`
#[derive(Serialize)]
pub struct ScheduleNextData {
    pub at: String,
    pub next: Option<String>,
}

// ============================================================================
// Output functions
// ============================================================================

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print JSON-RPC error to stdout
pub fn print_json_error(code: i32, message: &str) {
    print_error(&JsonRpcError::new(code, message));
}

/// print JSON-RPC error with suggestions
pub fn print_json_error_with_suggestions(code: i32, message: &str, suggestions: Vec<String>) {
    print_error(&JsonRpcError::with_suggestions(code, message, suggestions));
}

/// print JSON-RPC error listing every problem found
pub fn print_json_error_with_details(code: i32, message: &str, details: Vec<String>) {
    print_error(&JsonRpcError::new(code, message).with_details(details));
}

fn print_error(error: &JsonRpcError) {
    if let Ok(json) = serde_json::to_string(error) {
        println!("{}", json);
    }
}
