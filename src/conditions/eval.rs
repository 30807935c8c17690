//! condition evaluator
//!
//! interprets a [`Condition`] tree against facts supplied by the caller.
//! nothing here executes expression text; facts are read through
//! [`FactSource`] by variable id.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::types::{Comparison, Condition, Value};
use crate::catalog::{OperatorType, ValueType};

/// read access to the live values a rule is tested against
pub trait FactSource {
    /// current value of a variable, `None` when unknown
    fn fact(&self, variable: &str) -> Option<Value>;
}

impl FactSource for HashMap<String, Value> {
    fn fact(&self, variable: &str) -> Option<Value> {
        self.get(variable).cloned()
    }
}

/// a flat map of variable id to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facts {
    values: HashMap<String, Value>,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// set a fact
    pub fn with(mut self, variable: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(variable.into(), value.into());
        self
    }

    pub fn insert(&mut self, variable: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(variable.into(), value.into());
    }

    /// flatten a JSON object into facts; nested objects become dotted ids
    /// (`{"booking": {"fare": 12}}` gives `booking.fare`)
    pub fn from_json(json: &serde_json::Value) -> Self {
        let mut facts = Facts::new();
        if let serde_json::Value::Object(map) = json {
            for (key, value) in map {
                facts.flatten_into(key, value);
            }
        }
        facts
    }

    fn flatten_into(&mut self, prefix: &str, json: &serde_json::Value) {
        match json {
            serde_json::Value::Object(map) => {
                for (key, value) in map {
                    self.flatten_into(&format!("{}.{}", prefix, key), value);
                }
            }
            other => {
                if let Ok(value) = serde_json::from_value::<Value>(other.clone()) {
                    self.values.insert(prefix.to_string(), value);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FactSource for Facts {
    fn fact(&self, variable: &str) -> Option<Value> {
        self.values.get(variable).cloned()
    }
}

/// evaluate a condition against the given facts
///
/// `in_list` is interpreted as membership of the fact in the condition's
/// list, the same as `in`. its expression text is the constant `true`
/// (see `render_comparison`), so a stored expression and the tree can
/// disagree for `in_list` conditions.
pub fn evaluate<F: FactSource + ?Sized>(condition: &Condition, facts: &F) -> bool {
    match condition {
        // empty All = true (vacuous truth)
        Condition::All(conditions) => conditions.iter().all(|c| evaluate(c, facts)),
        // empty Any = false
        Condition::Any(conditions) => conditions.iter().any(|c| evaluate(c, facts)),
        Condition::Field(cmp) => evaluate_comparison(cmp, facts),
        Condition::Literal(b) => *b,
    }
}

fn evaluate_comparison<F: FactSource + ?Sized>(cmp: &Comparison, facts: &F) -> bool {
    if cmp.op.is_logical() || cmp.op == OperatorType::Unknown {
        return true;
    }

    let Some(actual) = facts.fact(&cmp.variable) else {
        tracing::debug!(variable = %cmp.variable, "no fact for variable, comparison is false");
        return false;
    };

    match cmp.op {
        OperatorType::Eq => values_equal(&actual, &cmp.value, cmp.value_type),
        OperatorType::Ne => !values_equal(&actual, &cmp.value, cmp.value_type),
        OperatorType::Gt => compare(&actual, &cmp.value) == Some(Ordering::Greater),
        OperatorType::Gte => matches!(
            compare(&actual, &cmp.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        OperatorType::Lt => compare(&actual, &cmp.value) == Some(Ordering::Less),
        OperatorType::Lte => matches!(
            compare(&actual, &cmp.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        OperatorType::Contains => contains(&actual, &cmp.value, cmp.value_type),
        OperatorType::StartsWith => match (actual.as_str(), cmp.value.as_str()) {
            (Some(a), Some(prefix)) => a.starts_with(prefix),
            _ => false,
        },
        OperatorType::EndsWith => match (actual.as_str(), cmp.value.as_str()) {
            (Some(a), Some(suffix)) => a.ends_with(suffix),
            _ => false,
        },
        OperatorType::In | OperatorType::InList => match &cmp.value {
            Value::List(list) => list
                .iter()
                .any(|v| values_equal(&actual, v, cmp.value_type)),
            single => values_equal(&actual, single, cmp.value_type),
        },
        OperatorType::Between => {
            let (min, max) = match cmp.value.as_list() {
                Some(items) => (
                    items.first().cloned().unwrap_or(Value::Number(0)),
                    items.get(1).cloned().unwrap_or(Value::Number(0)),
                ),
                None => (Value::Number(0), Value::Number(0)),
            };
            matches!(
                compare(&actual, &min),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(
                compare(&actual, &max),
                Some(Ordering::Less | Ordering::Equal)
            )
        }
        OperatorType::And | OperatorType::Or | OperatorType::Not | OperatorType::Unknown => true,
    }
}

// ============================================================================
// Comparison Helpers
// ============================================================================

fn values_equal(actual: &Value, expected: &Value, value_type: ValueType) -> bool {
    match value_type {
        ValueType::Number => match (actual.as_f64(), expected.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => actual == expected,
        },
        ValueType::Boolean => match (actual.as_bool(), expected.as_bool()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => {
            if actual.is_numeric() && expected.is_numeric() {
                actual.as_f64() == expected.as_f64()
            } else {
                actual.to_plain_string() == expected.to_plain_string()
            }
        }
    }
}

/// numeric ordering when both sides are numeric, lexical for strings
fn compare(actual: &Value, expected: &Value) -> Option<Ordering> {
    if actual.is_numeric() || expected.is_numeric() {
        let a = actual.as_f64()?;
        let b = expected.as_f64()?;
        return a.partial_cmp(&b);
    }

    match (actual, expected) {
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}

fn contains(actual: &Value, needle: &Value, value_type: ValueType) -> bool {
    match actual {
        Value::String(haystack) => needle
            .as_str()
            .map(|n| haystack.contains(n))
            .unwrap_or(false),
        Value::List(items) => items.iter().any(|item| values_equal(item, needle, value_type)),
        _ => false,
    }
}
