//! Field definition checks.

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::field::{FieldSchema, FieldType};

pub(super) fn validate_field_definitions(fields: &FieldSchema, errors: &mut Vec<SchemaError>) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();

    for (i, field) in fields.fields.iter().enumerate() {
        let id = field.field_id.as_str();
        if id.trim().is_empty() {
            errors.push(SchemaError::EmptyIdentifier {
                path: format!("fields[{}]", i),
                what: "field",
            });
            continue;
        }
        if !seen.insert(id) && reported.insert(id) {
            errors.push(SchemaError::DuplicateFieldId {
                field_id: id.to_string(),
            });
        }

        if let Some(options) = field.field_type.options() {
            if options.is_empty() {
                errors.push(SchemaError::MissingOptions {
                    field_id: id.to_string(),
                    field_type: field.field_type.name(),
                });
            }
            let mut values: HashSet<&str> = HashSet::new();
            let mut dupes: HashSet<&str> = HashSet::new();
            for opt in options {
                if !values.insert(opt.value.as_str()) && dupes.insert(opt.value.as_str()) {
                    errors.push(SchemaError::DuplicateOptionValue {
                        field_id: id.to_string(),
                        value: opt.value.clone(),
                    });
                }
            }
        }

        if let FieldType::Number {
            min: Some(min),
            max: Some(max),
        } = &field.field_type
        {
            if min > max {
                errors.push(SchemaError::InvalidNumberRange {
                    field_id: id.to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(v: serde_json::Value) -> FieldSchema {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn duplicate_ids_reported_once() {
        let fields = schema(json!([
            {"field_id": "a", "field_type": "text"},
            {"field_id": "a", "field_type": "text"},
            {"field_id": "a", "field_type": "date"},
        ]));
        let mut errors = Vec::new();
        validate_field_definitions(&fields, &mut errors);
        assert_eq!(
            errors,
            vec![SchemaError::DuplicateFieldId {
                field_id: "a".into()
            }]
        );
    }

    #[test]
    fn choice_fields_need_unique_options() {
        let fields = schema(json!([
            {"field_id": "empty", "field_type": "single_choice", "options": []},
            {"field_id": "dup", "field_type": "multi_choice",
             "options": [{"value": "x"}, {"value": "y"}, {"value": "x"}]},
        ]));
        let mut errors = Vec::new();
        validate_field_definitions(&fields, &mut errors);
        assert_eq!(
            errors,
            vec![
                SchemaError::MissingOptions {
                    field_id: "empty".into(),
                    field_type: "single_choice"
                },
                SchemaError::DuplicateOptionValue {
                    field_id: "dup".into(),
                    value: "x".into()
                },
            ]
        );
    }

    #[test]
    fn number_range_must_be_ordered() {
        let fields = schema(json!([
            {"field_id": "n", "field_type": "number", "min": 10, "max": 5},
            {"field_id": "ok", "field_type": "number", "min": 0},
        ]));
        let mut errors = Vec::new();
        validate_field_definitions(&fields, &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), "invalid_number_range");
    }
}
