//! exit codes for fleetrule commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error
//! specific codes help scripts distinguish between failure types

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// invalid command-line arguments or unreadable input file
pub const INVALID_ARGS: i32 = 2;

/// configuration file error
pub const CONFIG_ERROR: i32 = 3;

/// rule context isn't in the catalog
pub const CONTEXT_NOT_FOUND: i32 = 4;

/// rule compiled but the expression or its conditions are invalid
pub const INVALID_EXPRESSION: i32 = 5;

/// schedule failed structural validation
pub const INVALID_SCHEDULE: i32 = 6;
