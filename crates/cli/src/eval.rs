//! `assay eval`: one submission against one indicator definition.

use std::path::Path;
use std::process;

use assay_core::validate_indicator;
use assay_eval::{Engine, EngineConfig, IndicatorEvaluation, Submission};

use crate::{parse_definition, read_json, report_error, OutputFormat};

pub(crate) fn cmd_eval(
    definition_path: &Path,
    submission_path: &Path,
    config: EngineConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let doc = read_json(definition_path, "definition", output, quiet);
    let def = parse_definition(&doc, definition_path, output, quiet);

    // Only published (valid) definitions are evaluated.
    if let Err(errors) = validate_indicator(&def) {
        let msg = format!(
            "error: definition '{}' does not validate: {}",
            definition_path.display(),
            errors
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    let submission: Submission =
        match serde_json::from_value(read_json(submission_path, "submission", output, quiet)) {
            Ok(s) => s,
            Err(e) => {
                let msg = format!(
                    "error: malformed submission '{}': {}",
                    submission_path.display(),
                    e
                );
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        };

    let evaluation = Engine::new(config).evaluate(&def, &submission);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "indicator": def.code,
                "version": def.version,
                "evaluation": evaluation,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json)
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
        OutputFormat::Text => print_text(&def.code, &def.name, &evaluation),
    }
}

fn print_text(code: &str, name: &str, evaluation: &IndicatorEvaluation) {
    let status = evaluation
        .status()
        .map(|s| s.as_str())
        .unwrap_or("NOT EVALUABLE");
    if name.is_empty() {
        println!("{}: {}", code, status);
    } else {
        println!("{} {}: {}", code, name, status);
    }
    println!("Remark: {}", evaluation.result().remark);

    match evaluation {
        IndicatorEvaluation::Calculation(calc) => {
            if !calc.trace.fields_read.is_empty() {
                println!("Fields read: {}", calc.trace.fields_read.join(", "));
            }
            if calc.trace.has_issues() {
                println!("Data issues:");
                for issue in &calc.trace.issues {
                    println!("  {} ({}): {}", issue.subject, issue.rule_type, issue.kind);
                }
            }
        }
        IndicatorEvaluation::Checklist(list) => {
            println!(
                "Items: {} met, {} unmet, {} unknown",
                list.tally.met, list.tally.unmet, list.tally.unknown
            );
            for entry in &list.breakdown {
                println!("  {}: {}", entry.item_id, outcome_label(entry.outcome));
            }
        }
    }
}

fn outcome_label(outcome: assay_core::ItemOutcome) -> &'static str {
    match outcome {
        assay_core::ItemOutcome::Met => "met",
        assay_core::ItemOutcome::Unmet => "unmet",
        assay_core::ItemOutcome::Unknown => "unknown",
    }
}
