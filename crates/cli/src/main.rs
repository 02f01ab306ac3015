mod eval;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use assay_core::{validate_indicator, IndicatorDefinition};
use assay_eval::{aggregate_labels, EngineConfig};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Compliance determination engine toolchain.
#[derive(Parser)]
#[command(name = "assay", version, about = "Compliance determination engine toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an indicator definition against the JSON Schema and the
    /// publish-time checks
    Validate {
        /// Path to the indicator definition JSON file
        definition: PathBuf,
    },

    /// Evaluate one submission against an indicator definition
    Eval {
        /// Path to the indicator definition JSON file
        definition: PathBuf,
        /// Path to the submission JSON file
        #[arg(long)]
        submission: PathBuf,
    },

    /// Roll indicator statuses up to a governance-area verdict
    Aggregate {
        /// Path to a JSON array of status labels (null for not evaluated)
        statuses: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { definition } => {
            cmd_validate(&definition, cli.output, cli.quiet);
        }
        Commands::Eval {
            definition,
            submission,
        } => {
            let config = load_config(cli.config.as_deref(), cli.output, cli.quiet);
            eval::cmd_eval(&definition, &submission, config, cli.output, cli.quiet);
        }
        Commands::Aggregate { statuses } => {
            cmd_aggregate(&statuses, cli.output, cli.quiet);
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, output: OutputFormat, quiet: bool) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    match EngineConfig::load(path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded engine config");
            config
        }
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

/// Read and parse a JSON file, exiting with a reported error on failure.
pub(crate) fn read_json(
    path: &Path,
    what: &str,
    output: OutputFormat,
    quiet: bool,
) -> serde_json::Value {
    let src = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading {} file '{}': {}", what, path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match serde_json::from_str(&src) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Deserialize a definition document, exiting on shape errors that the
/// JSON Schema did not already catch.
pub(crate) fn parse_definition(
    doc: &serde_json::Value,
    path: &Path,
    output: OutputFormat,
    quiet: bool,
) -> IndicatorDefinition {
    match IndicatorDefinition::from_json(doc) {
        Ok(def) => def,
        Err(e) => {
            let msg = format!("error: malformed definition '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

static INDICATOR_SCHEMA_STR: &str = include_str!("../../../docs/indicator-schema.json");

fn cmd_validate(definition_path: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(INDICATOR_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded indicator schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc = read_json(definition_path, "definition", output, quiet);

    // Structural pass first: a document that does not have the right shape
    // cannot be checked semantically.
    let structural: Vec<serde_json::Value> = validator
        .iter_errors(&doc)
        .map(|e| {
            serde_json::json!({
                "code": "json_schema",
                "message": e.to_string(),
            })
        })
        .collect();
    if !structural.is_empty() {
        report_invalid("json_schema", &structural, output, quiet);
        process::exit(1);
    }

    let def = parse_definition(&doc, definition_path, output, quiet);
    match validate_indicator(&def) {
        Ok(()) => {
            tracing::info!(indicator = %def.code, version = def.version, "definition is valid");
            if !quiet {
                match output {
                    OutputFormat::Text => println!("valid"),
                    OutputFormat::Json => {
                        let json = serde_json::json!({
                            "valid": true,
                            "code": def.code,
                            "version": def.version,
                        });
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&json).unwrap_or_default()
                        );
                    }
                }
            }
        }
        Err(errors) => {
            let items: Vec<serde_json::Value> = errors
                .iter()
                .map(assay_core::SchemaError::to_json_value)
                .collect();
            report_invalid("schema_validator", &items, output, quiet);
            process::exit(1);
        }
    }
}

fn report_invalid(stage: &str, errors: &[serde_json::Value], output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Text => {
            if !quiet {
                eprintln!("invalid definition ({} error(s))", errors.len());
                for err in errors {
                    eprintln!("  - {}", err["message"].as_str().unwrap_or_default());
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": false,
                "stage": stage,
                "errors": errors,
            });
            eprintln!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
    }
}

fn cmd_aggregate(statuses_path: &Path, output: OutputFormat, quiet: bool) {
    let doc = read_json(statuses_path, "statuses", output, quiet);
    let labels: Vec<Option<String>> = match serde_json::from_value(doc) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!(
                "error: '{}' must be a JSON array of status strings or null: {}",
                statuses_path.display(),
                e
            );
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let result = aggregate_labels(labels.iter().map(|l| l.as_deref()));
    tracing::info!(indicators = labels.len(), result = %result, "area aggregated");

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => println!("{}", result),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "result": result,
                "indicators": labels.len(),
            });
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
