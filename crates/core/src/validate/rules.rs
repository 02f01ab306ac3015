//! Calculation schema checks: arity, field references, thresholds.

use rust_decimal::Decimal;

use crate::error::SchemaError;
use crate::field::FieldSchema;
use crate::rule::{CalculationSchema, Rule};

pub(super) fn validate_calculation(
    schema: &CalculationSchema,
    fields: &FieldSchema,
    errors: &mut Vec<SchemaError>,
) {
    if schema.condition_groups.is_empty() {
        errors.push(SchemaError::NoConditionGroups);
    }
    for (gi, group) in schema.condition_groups.iter().enumerate() {
        let group_path = format!("condition_groups[{}]", gi);
        if group.rules.is_empty() {
            errors.push(SchemaError::EmptyConditionGroup {
                path: group_path.clone(),
            });
        }
        for (ri, rule) in group.rules.iter().enumerate() {
            validate_rule(rule, &format!("{}.rules[{}]", group_path, ri), fields, errors);
        }
    }
}

/// Walk one rule subtree. `path` locates `rule` within the schema.
pub(super) fn validate_rule(
    rule: &Rule,
    path: &str,
    fields: &FieldSchema,
    errors: &mut Vec<SchemaError>,
) {
    match rule {
        Rule::AndAll { conditions } | Rule::OrAny { conditions } => {
            if conditions.len() < 2 {
                errors.push(SchemaError::TooFewConditions {
                    path: path.to_string(),
                    rule_type: rule.kind_name(),
                    found: conditions.len(),
                });
            }
            for (i, c) in conditions.iter().enumerate() {
                validate_rule(c, &format!("{}.conditions[{}]", path, i), fields, errors);
            }
        }
        Rule::PercentageThreshold {
            field_id,
            threshold,
            ..
        } => {
            check_field(field_id, path, fields, errors);
            if *threshold < Decimal::ZERO || *threshold > Decimal::ONE_HUNDRED {
                errors.push(SchemaError::ThresholdOutOfRange {
                    path: path.to_string(),
                    rule_type: rule.kind_name(),
                    threshold: threshold.to_string(),
                    allowed: "[0, 100]",
                });
            }
        }
        Rule::CountThreshold {
            field_id,
            threshold,
            ..
        } => {
            check_field(field_id, path, fields, errors);
            if *threshold < Decimal::ZERO {
                errors.push(SchemaError::ThresholdOutOfRange {
                    path: path.to_string(),
                    rule_type: rule.kind_name(),
                    threshold: threshold.to_string(),
                    allowed: "[0, \u{221e})",
                });
            }
        }
        Rule::MatchValue { field_id, .. } => {
            check_field(field_id, path, fields, errors);
        }
        Rule::BbiFunctionalityCheck { bbi_id, .. } => {
            if bbi_id.trim().is_empty() {
                errors.push(SchemaError::EmptyIdentifier {
                    path: path.to_string(),
                    what: "bbi",
                });
            }
        }
    }
}

fn check_field(field_id: &str, path: &str, fields: &FieldSchema, errors: &mut Vec<SchemaError>) {
    if field_id.trim().is_empty() {
        errors.push(SchemaError::EmptyIdentifier {
            path: path.to_string(),
            what: "field",
        });
    } else if !fields.contains(field_id) {
        errors.push(SchemaError::UnknownFieldReference {
            path: path.to_string(),
            field_id: field_id.to_string(),
        });
    }
}
