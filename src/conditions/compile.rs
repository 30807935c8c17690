//! condition compiler - renders an ordered condition list as expression text
//!
//! output shape per operator:
//! - `v == x`, `v != x`, `v > x` ... for the comparison operators
//! - `v.includes(x)`, `v.startsWith(x)`, `v.endsWith(x)` for the string operators
//! - `[a, b].includes(v)` for `in`
//! - `v >= min && v <= max` for `between`
//! - `true` for anything else, or when the condition has no variable
//!
//! string values are quoted verbatim; embedded quotes are not escaped.

use serde::Serialize;

use super::types::{ConditionExpression, Value};
use super::validate::validate_expression;
use crate::catalog::{OperatorType, RuleContext, ValueType};

/// format a value for expression text according to the variable's declared type
///
/// lists format each element with the same declared type
pub fn format_value(value: &Value, value_type: ValueType) -> String {
    if let Value::List(items) = value {
        let parts: Vec<String> = items.iter().map(|v| format_value(v, value_type)).collect();
        return format!("[{}]", parts.join(", "));
    }

    match value_type {
        ValueType::String => format!("\"{}\"", value.to_plain_string()),
        ValueType::Boolean => match value.as_bool() {
            Some(b) => b.to_string(),
            None => value.to_plain_string(),
        },
        _ => value.to_plain_string(),
    }
}

/// `[min, max]` from a between payload; anything else is `[0, 0]`
fn between_bounds(value: &Value) -> (Value, Value) {
    match value {
        Value::List(items) => (
            items.first().cloned().unwrap_or(Value::Number(0)),
            items.get(1).cloned().unwrap_or(Value::Number(0)),
        ),
        _ => (Value::Number(0), Value::Number(0)),
    }
}

/// render one condition without its connective
pub fn render_comparison(condition: &ConditionExpression) -> String {
    let Some(variable) = &condition.variable else {
        return "true".to_string();
    };

    let v = &variable.id;
    let ty = variable.value_type;

    match condition.operator {
        OperatorType::Eq
        | OperatorType::Ne
        | OperatorType::Gt
        | OperatorType::Gte
        | OperatorType::Lt
        | OperatorType::Lte => format!(
            "{} {} {}",
            v,
            condition.operator.symbol(),
            format_value(&condition.value, ty)
        ),
        OperatorType::Contains => format!("{}.includes({})", v, format_value(&condition.value, ty)),
        OperatorType::StartsWith => {
            format!("{}.startsWith({})", v, format_value(&condition.value, ty))
        }
        OperatorType::EndsWith => {
            format!("{}.endsWith({})", v, format_value(&condition.value, ty))
        }
        OperatorType::In => {
            let list = match &condition.value {
                Value::List(_) => condition.value.clone(),
                other => Value::List(vec![other.clone()]),
            };
            format!("{}.includes({})", format_value(&list, ty), v)
        }
        OperatorType::Between => {
            let (min, max) = between_bounds(&condition.value);
            format!(
                "{} >= {} && {} <= {}",
                v,
                min.to_plain_string(),
                v,
                max.to_plain_string()
            )
        }
        other => {
            tracing::debug!(
                condition = %condition.id,
                operator = %other,
                "operator has no expression form, emitting true"
            );
            "true".to_string()
        }
    }
}

/// compile an ordered condition list into one expression string
///
/// each condition's connective trails it and is always emitted, including
/// on the last condition; `validate_expression` does not reject the dangling
/// operator, and `Condition::from_expressions` ignores it
pub fn build_expression(conditions: &[ConditionExpression]) -> String {
    if conditions.is_empty() {
        return "true".to_string();
    }

    conditions
        .iter()
        .map(|c| {
            let mut rendered = render_comparison(c);
            if let Some(op) = c.logical_operator {
                rendered.push(' ');
                rendered.push_str(&op.to_string());
            }
            rendered
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// result of compiling a rule for storage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledRule {
    pub expression: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// every problem found, `error` is the first of these
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
}

/// check conditions against what a context allows
pub fn check_against_context(ctx: &RuleContext, conditions: &[ConditionExpression]) -> Vec<String> {
    let mut problems = Vec::new();

    for (i, condition) in conditions.iter().enumerate() {
        let label = if condition.id.is_empty() {
            format!("conditions[{}]", i)
        } else {
            format!("condition '{}'", condition.id)
        };

        let Some(variable) = &condition.variable else {
            continue;
        };

        let Some(known) = ctx.variable(&variable.id) else {
            problems.push(format!(
                "{}: variable '{}' is not available in context '{}'",
                label, variable.id, ctx.id
            ));
            continue;
        };

        if condition.operator == OperatorType::Unknown {
            problems.push(format!("{}: unknown operator", label));
        } else if !known.allows(condition.operator) || !ctx.allows_operator(condition.operator) {
            problems.push(format!(
                "{}: operator '{}' is not allowed for '{}' ({})",
                label, condition.operator, known.id, known.value_type
            ));
        }
    }

    problems
}

/// compile conditions for a context: expression text plus validity
pub fn compile_rule(ctx: &RuleContext, conditions: &[ConditionExpression]) -> CompiledRule {
    let expression = build_expression(conditions);

    let mut problems = Vec::new();
    if let Some(error) = validate_expression(&expression).error {
        problems.push(error);
    }
    problems.extend(check_against_context(ctx, conditions));

    if !problems.is_empty() {
        tracing::debug!(context = %ctx.id, count = problems.len(), "compiled rule has problems");
    }

    CompiledRule {
        valid: problems.is_empty(),
        error: problems.first().cloned(),
        expression,
        problems,
    }
}
