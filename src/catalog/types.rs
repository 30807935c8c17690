//! core types for the variable catalog

use std::fmt;

use serde::{Deserialize, Serialize};

/// the value type a rule variable carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Date,
    Array,
    Object,
}

impl ValueType {
    /// parse a type name ("string", "number", ...), case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "string" | "str" | "text" => Some(ValueType::String),
            "number" | "num" | "int" | "float" => Some(ValueType::Number),
            "boolean" | "bool" => Some(ValueType::Boolean),
            "date" | "datetime" => Some(ValueType::Date),
            "array" | "list" => Some(ValueType::Array),
            "object" | "map" => Some(ValueType::Object),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// operators a condition may use
///
/// serialised as the symbol the expression text uses (`"=="`, `"startsWith"`,
/// `"in_list"`, `"&&"` ...). anything unrecognised becomes [`OperatorType::Unknown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperatorType {
    /// equality: ==, eq, equals
    Eq,
    /// inequality: !=, ne, not_equals
    Ne,
    /// greater than: >, gt
    Gt,
    /// greater than or equal: >=, gte
    Gte,
    /// less than: <, lt
    Lt,
    /// less than or equal: <=, lte
    Lte,
    Contains,
    StartsWith,
    EndsWith,
    /// membership of the variable in a literal list
    In,
    /// inclusive range: value is `[min, max]`
    Between,
    InList,
    And,
    Or,
    Not,
    /// an operator this crate does not know; compiles to `true`
    Unknown,
}

impl OperatorType {
    /// parse operator from string (supports the symbolic and word forms)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" | "eq" | "equals" => Some(OperatorType::Eq),
            "!=" | "ne" | "not_equals" => Some(OperatorType::Ne),
            ">" | "gt" | "greater_than" => Some(OperatorType::Gt),
            ">=" | "gte" | "greater_than_or_equal" => Some(OperatorType::Gte),
            "<" | "lt" | "less_than" => Some(OperatorType::Lt),
            "<=" | "lte" | "less_than_or_equal" => Some(OperatorType::Lte),
            "contains" => Some(OperatorType::Contains),
            "startsWith" | "starts_with" => Some(OperatorType::StartsWith),
            "endsWith" | "ends_with" => Some(OperatorType::EndsWith),
            "in" => Some(OperatorType::In),
            "between" => Some(OperatorType::Between),
            "in_list" | "inList" => Some(OperatorType::InList),
            "&&" | "and" => Some(OperatorType::And),
            "||" | "or" => Some(OperatorType::Or),
            "!" | "not" => Some(OperatorType::Not),
            _ => None,
        }
    }

    /// the canonical symbol used in expression text and serialised rules
    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorType::Eq => "==",
            OperatorType::Ne => "!=",
            OperatorType::Gt => ">",
            OperatorType::Gte => ">=",
            OperatorType::Lt => "<",
            OperatorType::Lte => "<=",
            OperatorType::Contains => "contains",
            OperatorType::StartsWith => "startsWith",
            OperatorType::EndsWith => "endsWith",
            OperatorType::In => "in",
            OperatorType::Between => "between",
            OperatorType::InList => "in_list",
            OperatorType::And => "&&",
            OperatorType::Or => "||",
            OperatorType::Not => "!",
            OperatorType::Unknown => "unknown",
        }
    }

    /// true for the connectives (`&& || !`)
    pub fn is_logical(&self) -> bool {
        matches!(self, OperatorType::And | OperatorType::Or | OperatorType::Not)
    }
}

impl From<String> for OperatorType {
    fn from(s: String) -> Self {
        OperatorType::parse(s.trim()).unwrap_or(OperatorType::Unknown)
    }
}

impl From<OperatorType> for String {
    fn from(op: OperatorType) -> Self {
        op.symbol().to_string()
    }
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// one named variable a rule may test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
    /// dotted path the evaluator resolves (e.g. "booking.fare")
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// empty means "whatever the type suggests"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_operators: Vec<OperatorType>,
}

impl VariableDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value_type: ValueType,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value_type,
            category: category.into(),
            description: String::new(),
            allowed_operators: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_operators(mut self, operators: Vec<OperatorType>) -> Self {
        self.allowed_operators = operators;
        self
    }

    /// operators legal for this variable, falling back to the type table
    pub fn operators(&self) -> Vec<OperatorType> {
        if self.allowed_operators.is_empty() {
            super::suggested_operators(self.value_type)
        } else {
            self.allowed_operators.clone()
        }
    }

    pub fn allows(&self, op: OperatorType) -> bool {
        self.operators().contains(&op)
    }
}

/// the variables and operators legal for one rule-authoring surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleContext {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
    #[serde(default)]
    pub operators: Vec<OperatorType>,
}

impl RuleContext {
    /// build a context whose operator set is the union of its variables' operators
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        variables: Vec<VariableDefinition>,
    ) -> Self {
        let mut operators: Vec<OperatorType> = Vec::new();
        for op in variables.iter().flat_map(|v| v.operators()) {
            if !operators.contains(&op) {
                operators.push(op);
            }
        }

        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            variables,
            operators,
        }
    }

    /// look up a variable by id
    pub fn variable(&self, id: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|v| v.id == id)
    }

    /// an empty operator list means every operator is allowed
    pub fn allows_operator(&self, op: OperatorType) -> bool {
        self.operators.is_empty() || self.operators.contains(&op)
    }
}
