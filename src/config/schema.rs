use serde::{Deserialize, Serialize};

use crate::catalog::RuleContext;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// contexts added to (or replacing) the built-in ones
    #[serde(default)]
    pub contexts: Vec<RuleContext>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// IANA zone name shown next to schedule results; evaluation itself
    /// uses the local wall clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// context used by `compile`/`eval` when neither the draft nor the
    /// command line names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_context: Option<String>,
}
