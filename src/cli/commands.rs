use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::catalog::{self, Catalog, RuleContext};
use crate::conditions::{self, Condition, Facts, RuleDraft};
use crate::config::{self, Config};
use crate::schedule::{self, PromotionSchedule};

use super::exit_codes;
use super::output::{
    self, CompileData, ContextSummary, EvalData, OperatorsData, OutputMode, ScheduleActiveData,
    ScheduleCoverageData, ScheduleDescribeData, ScheduleNextData,
};

/// datetime layouts accepted by --at
const AT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// layout used when printing instants
const AT_DISPLAY: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Parser)]
#[command(name = "fleetrule")]
#[command(about = "Compile rule conditions and evaluate promotion schedules")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides FLEETRULE_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug details to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a rule draft into expression text
    Compile {
        /// Rule draft JSON file ("-" reads stdin)
        file: PathBuf,

        /// Rule context id (overrides the draft and settings.default_context)
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Evaluate a rule draft against a facts object
    Eval {
        /// Rule draft JSON file ("-" reads stdin)
        file: PathBuf,

        /// Facts JSON file; nested objects map to dotted variable ids
        #[arg(long)]
        facts: PathBuf,

        /// Rule context id (overrides the draft and settings.default_context)
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Check expression text for balanced parentheses and closed quotes
    CheckExpr {
        /// Expression text
        expression: String,
    },

    /// Show the operators suggested for a value type
    Operators {
        /// Value type: string, number, boolean, date, array, object
        #[arg(value_name = "TYPE")]
        type_name: String,
    },

    /// List rule contexts, or show one
    Contexts {
        /// Context id to show
        id: Option<String>,
    },

    /// Evaluate and inspect promotion schedules
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Is the promotion available at an instant
    Active {
        /// Schedule JSON file ("-" reads stdin)
        file: PathBuf,

        /// Local date-time, YYYY-MM-DDTHH:MM[:SS] (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// One-line summary and weekly coverage
    Describe {
        /// Schedule JSON file ("-" reads stdin)
        file: PathBuf,
    },

    /// Percent of an average day the schedule is active
    Coverage {
        /// Schedule JSON file ("-" reads stdin)
        file: PathBuf,
    },

    /// Next time a days-and-times schedule turns on
    Next {
        /// Schedule JSON file ("-" reads stdin)
        file: PathBuf,

        /// Local date-time, YYYY-MM-DDTHH:MM[:SS] (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Check a schedule for structural errors
    Validate {
        /// Schedule JSON file ("-" reads stdin)
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show config file path
    Path,
    /// Check the config file for errors
    Verify,
    /// Reset configuration to defaults
    Reset,
    /// Print a default configuration with an example custom context
    Default,
}

/// report a failure in the current output mode and exit with `code`
fn fail(
    mode: OutputMode,
    code: i32,
    message: &str,
    suggestions: Vec<String>,
    details: Vec<String>,
) -> ! {
    if mode.is_json() {
        if !details.is_empty() {
            output::print_json_error_with_details(code, message, details);
        } else if !suggestions.is_empty() {
            output::print_json_error_with_suggestions(code, message, suggestions);
        } else {
            output::print_json_error(code, message);
        }
    } else {
        eprintln!("error: {}", message);
        for detail in &details {
            eprintln!("  - {}", detail);
        }
        if !suggestions.is_empty() {
            eprintln!("did you mean: {}?", suggestions.join(", "));
        }
    }
    std::process::exit(code);
}

/// read a file, or stdin for "-"
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_or_fail(mode: OutputMode, path: &Path) -> String {
    match read_input(path) {
        Ok(text) => text,
        Err(e) => fail(mode, exit_codes::INVALID_ARGS, &format!("{:#}", e), vec![], vec![]),
    }
}

fn load_config_or_fail(mode: OutputMode, config_path: Option<&Path>) -> Config {
    match config::load_with_override(config_path) {
        Ok(config) => config,
        Err(e) => fail(mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e), vec![], vec![]),
    }
}

fn read_draft(mode: OutputMode, path: &Path) -> RuleDraft {
    let text = read_or_fail(mode, path);
    match RuleDraft::from_json(&text) {
        Ok(draft) => draft,
        Err(e) => fail(
            mode,
            exit_codes::INVALID_ARGS,
            &format!("invalid rule draft {}: {}", path.display(), e),
            vec![],
            vec![],
        ),
    }
}

fn read_schedule(mode: OutputMode, path: &Path) -> PromotionSchedule {
    let text = read_or_fail(mode, path);
    match PromotionSchedule::from_json(&text) {
        Ok(schedule) => schedule,
        Err(e) => fail(
            mode,
            exit_codes::INVALID_ARGS,
            &format!("invalid schedule {}: {}", path.display(), e),
            vec![],
            vec![],
        ),
    }
}

/// pick the context: --context, then the draft's own, then settings.default_context
fn resolve_context<'a>(
    mode: OutputMode,
    catalog: &'a Catalog,
    config: &Config,
    explicit: Option<&str>,
    draft: &RuleDraft,
) -> &'a RuleContext {
    let Some(id) = explicit
        .or(draft.context.as_deref())
        .or(config.settings.default_context.as_deref())
    else {
        fail(
            mode,
            exit_codes::INVALID_ARGS,
            "no rule context given (use --context, a \"context\" field, or settings.default_context)",
            catalog.contexts().iter().map(|c| c.id.clone()).collect(),
            vec![],
        );
    };

    match catalog.lookup_context(id) {
        Some(ctx) => ctx,
        None => fail(
            mode,
            exit_codes::CONTEXT_NOT_FOUND,
            &format!("context '{}' not found", id),
            catalog.suggest_context_ids(id),
            vec![],
        ),
    }
}

/// parse --at, defaulting to the local wall clock
fn parse_at(at: Option<&str>) -> Result<NaiveDateTime> {
    let Some(at) = at else {
        return Ok(chrono::Local::now().naive_local());
    };

    AT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(at.trim(), fmt).ok())
        .with_context(|| format!("invalid --at '{}', expected YYYY-MM-DDTHH:MM[:SS]", at))
}

fn parse_at_or_fail(mode: OutputMode, at: Option<&str>) -> NaiveDateTime {
    match parse_at(at) {
        Ok(now) => now,
        Err(e) => fail(mode, exit_codes::INVALID_ARGS, &format!("{:#}", e), vec![], vec![]),
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Compile { file, context } => {
            let draft = read_draft(output_mode, &file);
            let config = load_config_or_fail(output_mode, config_path);
            let catalog = config::catalog(&config);
            let ctx = resolve_context(output_mode, &catalog, &config, context.as_deref(), &draft);

            let resolved = draft.resolve(ctx);
            let compiled = conditions::compile_rule(ctx, &resolved.conditions);

            let mut problems: Vec<String> =
                resolved.unresolved.iter().map(|u| u.describe()).collect();
            problems.extend(compiled.problems.iter().cloned());
            let valid = problems.is_empty();

            let data = CompileData {
                context: ctx.id.clone(),
                expression: compiled.expression,
                valid,
                error: problems.first().cloned(),
                problems,
                unresolved: resolved.unresolved,
            };

            if output_mode.is_json() {
                output::print_json(&data);
            } else if !output_mode.is_quiet() {
                println!("{}", data.expression);
            }

            if !valid {
                if !output_mode.is_json() {
                    eprintln!("✗ Rule has {} problem(s):", data.problems.len());
                    for problem in &data.problems {
                        eprintln!("  - {}", problem);
                    }
                }
                std::process::exit(exit_codes::INVALID_EXPRESSION);
            }
            Ok(())
        }

        Commands::Eval {
            file,
            facts,
            context,
        } => {
            let draft = read_draft(output_mode, &file);
            let facts_text = read_or_fail(output_mode, &facts);
            let facts_json: serde_json::Value = match serde_json::from_str(&facts_text) {
                Ok(v) => v,
                Err(e) => fail(
                    output_mode,
                    exit_codes::INVALID_ARGS,
                    &format!("invalid facts {}: {}", facts.display(), e),
                    vec![],
                    vec![],
                ),
            };
            let facts = Facts::from_json(&facts_json);

            let config = load_config_or_fail(output_mode, config_path);
            let catalog = config::catalog(&config);
            let ctx = resolve_context(output_mode, &catalog, &config, context.as_deref(), &draft);

            let resolved = draft.resolve(ctx);
            let condition = Condition::from_expressions(&resolved.conditions);
            let matched = conditions::evaluate(&condition, &facts);
            tracing::debug!(condition = %condition, matched, "evaluated rule");

            let data = EvalData {
                context: ctx.id.clone(),
                matched,
                condition: condition.to_string(),
                variables: condition.variables().into_iter().map(String::from).collect(),
                facts: facts.len(),
                unresolved: resolved.unresolved,
            };

            if output_mode.is_json() {
                output::print_json(&data);
            } else if !output_mode.is_quiet() {
                for u in &data.unresolved {
                    eprintln!("warning: {}", u.describe());
                }
                println!("{}", matched);
            }
            Ok(())
        }

        Commands::CheckExpr { expression } => {
            let check = conditions::validate_expression(&expression);

            if let Some(error) = &check.error {
                fail(
                    output_mode,
                    exit_codes::INVALID_EXPRESSION,
                    error,
                    vec![],
                    vec![],
                );
            }

            if output_mode.is_json() {
                output::print_json(&check);
            } else if !output_mode.is_quiet() {
                println!("✓ Expression is valid");
            }
            Ok(())
        }

        Commands::Operators { type_name } => {
            let operators: Vec<String> = catalog::suggested_operators_for(&type_name)
                .iter()
                .map(|op| op.symbol().to_string())
                .collect();

            if output_mode.is_json() {
                output::print_json(&OperatorsData {
                    type_name,
                    operators,
                });
            } else if !output_mode.is_quiet() {
                for op in &operators {
                    println!("{}", op);
                }
            }
            Ok(())
        }

        Commands::Contexts { id } => {
            let config = load_config_or_fail(output_mode, config_path);
            let catalog = config::catalog(&config);

            match id {
                None => {
                    let rows: Vec<ContextSummary> = catalog
                        .contexts()
                        .iter()
                        .map(|c| ContextSummary {
                            id: c.id.clone(),
                            name: c.name.clone(),
                            description: c.description.clone(),
                            variables: c.variables.len(),
                        })
                        .collect();

                    if output_mode.is_json() {
                        output::print_json(&rows);
                    } else if !output_mode.is_quiet() {
                        let width = rows.iter().map(|r| r.id.len()).max().unwrap_or(0);
                        for row in &rows {
                            println!(
                                "{:<width$}  {} ({} variables)",
                                row.id,
                                row.name,
                                row.variables,
                                width = width
                            );
                        }
                    }
                }
                Some(id) => {
                    let Some(ctx) = catalog.lookup_context(&id) else {
                        fail(
                            output_mode,
                            exit_codes::CONTEXT_NOT_FOUND,
                            &format!("context '{}' not found", id),
                            catalog.suggest_context_ids(&id),
                            vec![],
                        );
                    };

                    if output_mode.is_json() {
                        output::print_json(ctx);
                    } else if !output_mode.is_quiet() {
                        println!("{} - {}", ctx.id, ctx.name);
                        if !ctx.description.is_empty() {
                            println!("{}", ctx.description);
                        }
                        println!();
                        let width = ctx.variables.iter().map(|v| v.id.len()).max().unwrap_or(0);
                        for var in &ctx.variables {
                            let ops: Vec<&str> =
                                var.operators().iter().map(|op| op.symbol()).collect();
                            println!(
                                "  {:<width$}  {:<8} {}",
                                var.id,
                                var.value_type.name(),
                                ops.join(" "),
                                width = width
                            );
                        }
                    }
                }
            }
            Ok(())
        }

        Commands::Schedule { command } => run_schedule(command, output_mode, config_path),

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = config::load_with_override(config_path)?;
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Path => {
                let path = config::get_config_path_with_override(config_path);
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommands::Reset => {
                let path = config::save_with_override(&Config::default(), config_path)?;
                if !output_mode.is_quiet() {
                    println!("Configuration reset to defaults: {}", path.display());
                }
                Ok(())
            }
            ConfigCommands::Default => {
                let config = config::default_with_examples();
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Verify => {
                let path = config::get_config_path_with_override(config_path);
                let errors = match config::verify(&path) {
                    Ok(errors) => errors,
                    Err(e) => fail(
                        output_mode,
                        exit_codes::CONFIG_ERROR,
                        &format!("{:#}", e),
                        vec![],
                        vec![],
                    ),
                };

                if errors.is_empty() {
                    if output_mode.is_json() {
                        output::print_json(&serde_json::json!({
                            "valid": true,
                            "path": path.display().to_string(),
                        }));
                    } else if !output_mode.is_quiet() {
                        println!("✓ Configuration is valid: {}", path.display());
                    }
                    Ok(())
                } else {
                    fail(
                        output_mode,
                        exit_codes::CONFIG_ERROR,
                        &format!(
                            "Configuration has {} error(s): {}",
                            errors.len(),
                            path.display()
                        ),
                        vec![],
                        errors,
                    );
                }
            }
        },
    }
}

fn run_schedule(
    command: ScheduleCommands,
    output_mode: OutputMode,
    config_path: Option<&Path>,
) -> Result<()> {
    match command {
        ScheduleCommands::Active { file, at } => {
            let schedule = read_schedule(output_mode, &file);
            let now = parse_at_or_fail(output_mode, at.as_deref());
            let config = load_config_or_fail(output_mode, config_path);

            let active = schedule::is_promotion_active_now(Some(&schedule), &now);
            let data = ScheduleActiveData {
                active,
                at: now.format(AT_DISPLAY).to_string(),
                description: schedule::schedule_description(Some(&schedule)),
                timezone: schedule.timezone.clone().or(config.settings.timezone),
            };

            if output_mode.is_json() {
                output::print_json(&data);
            } else if !output_mode.is_quiet() {
                let state = if active { "active" } else { "inactive" };
                match &data.timezone {
                    Some(tz) => println!("{} at {} ({})", state, data.at, tz),
                    None => println!("{} at {}", state, data.at),
                }
            }
        }

        ScheduleCommands::Describe { file } => {
            let schedule = read_schedule(output_mode, &file);
            let data = ScheduleDescribeData {
                description: schedule::schedule_description(Some(&schedule)),
                coverage: schedule::promotion_coverage(Some(&schedule)),
            };

            if output_mode.is_json() {
                output::print_json(&data);
            } else if !output_mode.is_quiet() {
                println!("{}", data.description);
                println!("coverage: {}%", data.coverage);
            }
        }

        ScheduleCommands::Coverage { file } => {
            let schedule = read_schedule(output_mode, &file);
            let coverage = schedule::promotion_coverage(Some(&schedule));

            if output_mode.is_json() {
                output::print_json(&ScheduleCoverageData { coverage });
            } else if !output_mode.is_quiet() {
                println!("{}", coverage);
            }
        }

        ScheduleCommands::Next { file, at } => {
            let schedule = read_schedule(output_mode, &file);
            let now = parse_at_or_fail(output_mode, at.as_deref());

            let next = schedule::next_available_time(Some(&schedule), &now);
            let data = ScheduleNextData {
                at: now.format(AT_DISPLAY).to_string(),
                next: next.map(|t| t.format(AT_DISPLAY).to_string()),
            };

            if output_mode.is_json() {
                output::print_json(&data);
            } else if !output_mode.is_quiet() {
                println!("{}", data.next.as_deref().unwrap_or("none"));
            }
        }

        ScheduleCommands::Validate { file } => {
            let schedule = read_schedule(output_mode, &file);
            let validation = schedule::validate_schedule(&schedule);

            if !validation.valid {
                fail(
                    output_mode,
                    exit_codes::INVALID_SCHEDULE,
                    &format!("Schedule has {} error(s)", validation.errors.len()),
                    vec![],
                    validation.errors,
                );
            }

            if output_mode.is_json() {
                output::print_json(&validation);
            } else if !output_mode.is_quiet() {
                println!("✓ Schedule is valid");
            }
        }
    }

    Ok(())
}
