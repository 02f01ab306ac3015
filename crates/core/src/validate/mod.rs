//! Publish-time schema validation.
//!
//! Checks an indicator's field schema together with its scoring mode and
//! returns every violation found. Nothing short-circuits on the first
//! error, so authors see the complete list in one pass. Evaluation never
//! calls into this module.

mod checklist;
mod dependency;
mod fields;
mod rules;

use crate::checklist::ChecklistItem;
use crate::error::{SchemaError, SchemaErrors};
use crate::field::FieldSchema;
use crate::indicator::{IndicatorDefinition, ScoringMode};
use crate::rule::CalculationSchema;

/// Validate a field schema against one scoring mode.
pub fn validate(fields: &FieldSchema, scoring: &ScoringMode) -> Vec<SchemaError> {
    let mut errors = validate_fields(fields);
    match scoring {
        ScoringMode::Calculation { schema } => {
            rules::validate_calculation(schema, fields, &mut errors);
        }
        ScoringMode::Checklist { items, .. } => {
            checklist::validate_items(items, &mut errors);
        }
    }
    errors
}

/// Field-schema checks only: id uniqueness, options, conditional
/// requirement references and the dependency graph.
pub fn validate_fields(fields: &FieldSchema) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    fields::validate_field_definitions(fields, &mut errors);
    dependency::validate_dependencies(fields, &mut errors);
    errors
}

/// Field schema plus a calculation schema.
pub fn validate_calculation(fields: &FieldSchema, schema: &CalculationSchema) -> Vec<SchemaError> {
    let mut errors = validate_fields(fields);
    rules::validate_calculation(schema, fields, &mut errors);
    errors
}

/// Field schema plus a checklist.
pub fn validate_checklist(fields: &FieldSchema, items: &[ChecklistItem]) -> Vec<SchemaError> {
    let mut errors = validate_fields(fields);
    checklist::validate_items(items, &mut errors);
    errors
}

/// Validate a whole indicator definition, as done before publishing.
pub fn validate_indicator(definition: &IndicatorDefinition) -> Result<(), SchemaErrors> {
    SchemaErrors::into_result(validate(&definition.fields, &definition.scoring))
}
