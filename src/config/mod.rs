mod schema;

pub use schema::{Config, Settings};

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, OperatorType, RuleContext, ValueType, VariableDefinition};

const CONFIG_ENV_VAR: &str = "FLEETRULE_CONFIG";

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    // ~/.fleetrule/config.json, or relative to cwd when there is no home
    dirs::home_dir()
        .unwrap_or_default()
        .join(".fleetrule")
        .join("config.json")
}

/// an explicit --config path wins over the env var and the default location
pub fn get_config_path_with_override(config_path: Option<&Path>) -> PathBuf {
    match config_path {
        Some(path) => path.to_path_buf(),
        None => get_config_path(),
    }
}

/// parse config text; comments and trailing commas are accepted
pub fn parse(content: &str) -> Result<Config> {
    json5::from_str(content).map_err(|e| anyhow!("invalid config: {}", e))
}

pub fn load() -> Result<Config> {
    load_with_override(None)
}

/// read the config file, falling back to defaults when it does not exist
///
/// nothing is written on read
pub fn load_with_override(config_path: Option<&Path>) -> Result<Config> {
    let path = get_config_path_with_override(config_path);

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// write the config as pretty JSON, returning the path written
pub fn save_with_override(config: &Config, config_path: Option<&Path>) -> Result<PathBuf> {
    let path = get_config_path_with_override(config_path);

    // ensure directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(path)
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config = parse(&content)?;

    Ok(verify_config(&config))
}

/// semantic checks on an already parsed config
pub fn verify_config(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen_contexts = HashSet::new();

    for (i, ctx) in config.contexts.iter().enumerate() {
        let prefix = format!("contexts[{}]", i);

        if ctx.id.trim().is_empty() {
            errors.push(format!("{}: id must not be empty", prefix));
        } else if !seen_contexts.insert(ctx.id.as_str()) {
            errors.push(format!("{}: duplicate context id '{}'", prefix, ctx.id));
        }

        let mut seen_variables = HashSet::new();
        for (j, var) in ctx.variables.iter().enumerate() {
            let var_prefix = format!("{}.variables[{}]", prefix, j);

            if var.id.trim().is_empty() {
                errors.push(format!("{}: id must not be empty", var_prefix));
            } else if !seen_variables.insert(var.id.as_str()) {
                errors.push(format!("{}: duplicate variable id '{}'", var_prefix, var.id));
            }

            if var.allowed_operators.contains(&OperatorType::Unknown) {
                errors.push(format!(
                    "{}: allowedOperators contains an unknown operator",
                    var_prefix
                ));
            }
        }
    }

    if let Some(default) = &config.settings.default_context {
        let catalog = catalog(config);
        if catalog.lookup_context(default).is_none() {
            let suggestions = catalog.suggest_context_ids(default);
            let mut message = format!("settings.default_context: unknown context '{}'", default);
            if let Some(best) = suggestions.first() {
                message.push_str(&format!(" (did you mean '{}'?)", best));
            }
            errors.push(message);
        }
    }

    errors
}

/// the built-in catalog extended with the config's contexts
pub fn catalog(config: &Config) -> Catalog {
    Catalog::with_contexts(&config.contexts)
}

/// generates a default config with an example custom context
pub fn default_with_examples() -> Config {
    let variables = vec![
        VariableDefinition::new("vehicle.mileage", "Mileage", ValueType::Number, "Vehicle")
            .with_description("Odometer reading in miles"),
        VariableDefinition::new("vehicle.fuelType", "Fuel type", ValueType::String, "Vehicle")
            .with_operators(vec![OperatorType::Eq, OperatorType::Ne, OperatorType::In]),
        VariableDefinition::new(
            "vehicle.motExpiry",
            "MOT expiry",
            ValueType::Date,
            "Compliance",
        ),
        VariableDefinition::new(
            "driver.onShift",
            "Driver on shift",
            ValueType::Boolean,
            "Driver",
        ),
    ];

    Config {
        contexts: vec![RuleContext::new(
            "fleet_alert",
            "Fleet alert",
            "Alerts raised from vehicle and compliance data",
            variables,
        )],
        settings: Settings {
            timezone: Some("Europe/London".to_string()),
            default_context: Some("booking_event".to_string()),
        },
    }
}
