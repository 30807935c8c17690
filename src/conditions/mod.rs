//! rule condition system
//!
//! turns an ordered list of authored conditions into:
//! - canonical expression text (`build_expression`) for storage and for
//!   external evaluators, with a shallow syntax check (`validate_expression`)
//! - a typed AST (`Condition::from_expressions`) that `evaluate` interprets
//!   against caller-supplied facts without executing any text
//!
//! conditions are joined by trailing connectives: the `logicalOperator` on
//! condition i sits between condition i and condition i+1.

mod compile;
mod draft;
mod eval;
mod types;
mod validate;

pub use compile::{
    build_expression, check_against_context, compile_rule, format_value, render_comparison,
    CompiledRule,
};
pub use draft::{DraftCondition, ResolvedDraft, RuleDraft, UnresolvedVariable, VariableRef};
pub use eval::{evaluate, FactSource, Facts};
pub use types::{Comparison, Condition, ConditionExpression, LogicalOperator, Value};
pub use validate::{validate_expression, ExpressionCheck};
