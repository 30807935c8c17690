//! variable catalog and operator suggestion table
//!
//! a [`Catalog`] is built once (built-in contexts plus any defined in the
//! config file) and handed to whatever compiles or checks rules. nothing in
//! here mutates after construction, so a catalog can be shared freely.

mod builtin;
mod types;

pub use builtin::BUILTIN_CONTEXTS;
pub use types::{OperatorType, RuleContext, ValueType, VariableDefinition};

use strsim::levenshtein;

/// max edit distance for "did you mean" suggestions
const SUGGESTION_DISTANCE: usize = 3;

/// operators offered for a value type
pub fn suggested_operators(value_type: ValueType) -> Vec<OperatorType> {
    use OperatorType::*;

    match value_type {
        ValueType::String => vec![Eq, Ne, Contains, StartsWith, EndsWith, In],
        ValueType::Number => vec![Eq, Ne, Gt, Gte, Lt, Lte, Between, In],
        ValueType::Boolean => vec![Eq, Ne],
        ValueType::Date => vec![Eq, Ne, Gt, Gte, Lt, Lte, Between],
        ValueType::Array => vec![Contains, InList],
        ValueType::Object => vec![Eq, Ne],
    }
}

/// operators offered for a type given by name; unknown names get `==` and `!=`
pub fn suggested_operators_for(type_name: &str) -> Vec<OperatorType> {
    match ValueType::parse(type_name) {
        Some(t) => suggested_operators(t),
        None => vec![OperatorType::Eq, OperatorType::Ne],
    }
}

/// immutable registry of rule contexts
#[derive(Debug, Clone)]
pub struct Catalog {
    contexts: Vec<RuleContext>,
}

impl Catalog {
    /// catalog holding only the built-in contexts
    pub fn builtin() -> Self {
        Self {
            contexts: BUILTIN_CONTEXTS.clone(),
        }
    }

    /// built-in contexts plus `extra`; an extra context replaces a built-in with the same id
    pub fn with_contexts(extra: &[RuleContext]) -> Self {
        let mut catalog = Self::builtin();
        for ctx in extra {
            match catalog.contexts.iter_mut().find(|c| c.id == ctx.id) {
                Some(existing) => *existing = ctx.clone(),
                None => catalog.contexts.push(ctx.clone()),
            }
        }
        catalog
    }

    pub fn contexts(&self) -> &[RuleContext] {
        &self.contexts
    }

    pub fn lookup_context(&self, id: &str) -> Option<&RuleContext> {
        self.contexts.iter().find(|c| c.id == id)
    }

    /// context ids close to `query`, nearest first
    pub fn suggest_context_ids(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        let mut scored: Vec<(usize, &str)> = self
            .contexts
            .iter()
            .map(|c| (levenshtein(&query, &c.id.to_lowercase()), c.id.as_str()))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .collect();

        scored.sort();
        scored.into_iter().map(|(_, id)| id.to_string()).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// variable ids in `ctx` close to `query`, nearest first
pub fn suggest_variable_ids(ctx: &RuleContext, query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    let mut scored: Vec<(usize, &str)> = ctx
        .variables
        .iter()
        .map(|v| (levenshtein(&query, &v.id.to_lowercase()), v.id.as_str()))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .collect();

    scored.sort();
    scored.into_iter().map(|(_, id)| id.to_string()).collect()
}
