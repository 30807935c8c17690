//! rule drafts - the authoring document a rule surface submits
//!
//! a draft names its context and lists conditions. each condition refers to
//! its variable either by id (resolved against the context) or by a full
//! definition:
//!
//! ```json
//! {
//!   "context": "booking_event",
//!   "conditions": [
//!     { "variable": "booking.fare", "operator": ">", "value": 50, "logicalOperator": "&&" },
//!     { "variable": "booking.isAirport", "operator": "==", "value": true }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::types::{ConditionExpression, LogicalOperator, Value};
use crate::catalog::{self, OperatorType, RuleContext, VariableDefinition};

/// how a draft condition names its variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableRef {
    Id(String),
    Definition(VariableDefinition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftCondition {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub variable: Option<VariableRef>,
    pub operator: OperatorType,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default)]
    pub conditions: Vec<DraftCondition>,
}

/// draft conditions turned into compiler input
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDraft {
    pub conditions: Vec<ConditionExpression>,
    /// variable ids that did not resolve, with suggestions
    pub unresolved: Vec<UnresolvedVariable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedVariable {
    pub condition: String,
    pub variable: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl UnresolvedVariable {
    pub fn describe(&self) -> String {
        let mut msg = format!(
            "{}: unknown variable '{}'",
            self.condition, self.variable
        );
        if !self.suggestions.is_empty() {
            msg.push_str(&format!(" (did you mean: {})", self.suggestions.join(", ")));
        }
        msg
    }
}

impl RuleDraft {
    /// parse a draft from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// resolve variable ids against `ctx`
    ///
    /// an id the context doesn't know resolves to no variable (which compiles
    /// to `true`) and is reported in `unresolved`. conditions without an id
    /// get `c1`, `c2`, ... by position.
    pub fn resolve(&self, ctx: &RuleContext) -> ResolvedDraft {
        let mut conditions = Vec::with_capacity(self.conditions.len());
        let mut unresolved = Vec::new();

        for (i, draft) in self.conditions.iter().enumerate() {
            let id = draft
                .id
                .clone()
                .unwrap_or_else(|| format!("c{}", i + 1));

            let variable = match &draft.variable {
                None => None,
                Some(VariableRef::Definition(def)) => Some(def.clone()),
                Some(VariableRef::Id(var_id)) => match ctx.variable(var_id) {
                    Some(def) => Some(def.clone()),
                    None => {
                        tracing::warn!(context = %ctx.id, variable = %var_id, "unknown variable in draft");
                        unresolved.push(UnresolvedVariable {
                            condition: id.clone(),
                            variable: var_id.clone(),
                            suggestions: catalog::suggest_variable_ids(ctx, var_id),
                        });
                        None
                    }
                },
            };

            conditions.push(ConditionExpression {
                id,
                variable,
                operator: draft.operator,
                value: draft.value.clone(),
                logical_operator: draft.logical_operator,
            });
        }

        ResolvedDraft {
            conditions,
            unresolved,
        }
    }
}
