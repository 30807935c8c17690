//! core types for the condition system

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{OperatorType, ValueType, VariableDefinition};

/// a value that can be used in comparisons
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// string value
    String(String),
    /// integer value
    Number(i64),
    /// floating point value
    Float(f64),
    /// boolean value
    Bool(bool),
    /// list of values (for 'in' and 'between')
    List(Vec<Value>),
    /// no value supplied
    #[default]
    Null,
}

impl Value {
    /// try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// try to get as float, also accepting numeric strings
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// try to get as bool, also accepting "true"/"false"
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            _ => None,
        }
    }

    /// try to get as list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Number(_) | Value::Float(_))
    }

    /// the value's string form without quoting; lists join with ","
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::List(l) => l
                .iter()
                .map(Value::to_plain_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// connective placed between a condition and the one after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "&&", alias = "and", alias = "AND")]
    And,
    #[serde(rename = "||", alias = "or", alias = "OR")]
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "&&"),
            LogicalOperator::Or => write!(f, "||"),
        }
    }
}

/// one authored condition in an ordered list
///
/// `logical_operator` joins this condition to the *next* one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionExpression {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub variable: Option<VariableDefinition>,
    pub operator: OperatorType,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,
}

impl ConditionExpression {
    pub fn new(
        id: impl Into<String>,
        variable: Option<VariableDefinition>,
        operator: OperatorType,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            variable,
            operator,
            value: value.into(),
            logical_operator: None,
        }
    }

    /// set the connective to the next condition
    pub fn then(mut self, op: LogicalOperator) -> Self {
        self.logical_operator = Some(op);
        self
    }
}

/// a single typed comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// variable id (e.g., "booking.fare")
    pub variable: String,
    /// declared type of the variable
    pub value_type: ValueType,
    /// comparison operator
    pub op: OperatorType,
    /// value to compare against
    pub value: Value,
}

impl Comparison {
    pub fn new(
        variable: impl Into<String>,
        value_type: ValueType,
        op: OperatorType,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            variable: variable.into(),
            value_type,
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable, self.op, self.value)
    }
}

/// the condition AST
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// all conditions must be true (AND)
    All(Vec<Condition>),
    /// any condition must be true (OR)
    Any(Vec<Condition>),
    /// a variable comparison
    Field(Comparison),
    /// constant
    Literal(bool),
}

impl Condition {
    /// the AST for one authored condition; no variable or an
    /// unsupported operator yields `Literal(true)`
    pub fn from_expression(expr: &ConditionExpression) -> Self {
        let Some(variable) = &expr.variable else {
            return Condition::Literal(true);
        };

        if expr.operator.is_logical() || expr.operator == OperatorType::Unknown {
            tracing::debug!(
                condition = %expr.id,
                operator = %expr.operator,
                "operator has no comparison form, treating as true"
            );
            return Condition::Literal(true);
        }

        Condition::Field(Comparison::new(
            variable.id.clone(),
            variable.value_type,
            expr.operator,
            expr.value.clone(),
        ))
    }

    /// build the AST for an ordered condition list
    ///
    /// `&&` binds tighter than `||`, the same precedence the expression text
    /// carries. a missing connective between two conditions reads as `&&`.
    pub fn from_expressions(list: &[ConditionExpression]) -> Self {
        if list.is_empty() {
            return Condition::Literal(true);
        }

        let mut groups: Vec<Vec<Condition>> = vec![Vec::new()];
        for (i, expr) in list.iter().enumerate() {
            if let Some(group) = groups.last_mut() {
                group.push(Condition::from_expression(expr));
            }
            let has_next = i + 1 < list.len();
            if has_next && expr.logical_operator == Some(LogicalOperator::Or) {
                groups.push(Vec::new());
            }
        }

        let mut terms: Vec<Condition> = groups
            .into_iter()
            .map(|mut group| {
                if group.len() == 1 {
                    group.remove(0)
                } else {
                    Condition::All(group)
                }
            })
            .collect();

        if terms.len() == 1 {
            terms.remove(0)
        } else {
            Condition::Any(terms)
        }
    }

    /// variable ids referenced anywhere in the tree, in first-seen order
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::All(items) | Condition::Any(items) => {
                for c in items {
                    c.collect_variables(out);
                }
            }
            Condition::Field(cmp) => {
                if !out.contains(&cmp.variable.as_str()) {
                    out.push(&cmp.variable);
                }
            }
            Condition::Literal(_) => {}
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::All(conditions) => {
                write!(f, "all(")?;
                for (i, c) in conditions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")")
            }
            Condition::Any(conditions) => {
                write!(f, "any(")?;
                for (i, c) in conditions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")")
            }
            Condition::Field(cmp) => write!(f, "{}", cmp),
            Condition::Literal(b) => write!(f, "{}", b),
        }
    }
}
