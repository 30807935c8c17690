//! rule condition compiler and promotion schedule evaluator
//!
//! - [`catalog`]: the variables and operators each rule surface may use
//! - [`conditions`]: condition lists to expression text, and a typed
//!   interpreter over caller-supplied facts
//! - [`schedule`]: when a promotion is available
//! - [`config`]: custom contexts and settings from the config file

pub mod catalog;
pub mod cli;
pub mod conditions;
pub mod config;
pub mod schedule;
