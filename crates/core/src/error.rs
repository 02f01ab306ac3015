//! Authoring errors reported by the schema validator.

use std::fmt;

/// A single publish-time violation. Each variant carries enough context
/// (ids and a location path) for an author to find the offending node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate field id '{field_id}'")]
    DuplicateFieldId { field_id: String },

    #[error("{path}: empty {what} id")]
    EmptyIdentifier { path: String, what: &'static str },

    #[error("{path}: references unknown field '{field_id}'")]
    UnknownFieldReference { path: String, field_id: String },

    #[error("field '{field_id}' has a conditional requirement on itself")]
    SelfDependency { field_id: String },

    #[error("conditional requirement cycle: {}", .cycle.join(" \u{2192} "))]
    DependencyCycle { cycle: Vec<String> },

    #[error(
        "field '{field_id}' is conditionally required on '{depends_on}' = {expected}, \
         which is not one of its options"
    )]
    ConditionalValueNotAnOption {
        field_id: String,
        depends_on: String,
        expected: String,
    },

    #[error("{field_type} field '{field_id}' must declare at least one option")]
    MissingOptions {
        field_id: String,
        field_type: &'static str,
    },

    #[error("field '{field_id}' declares option value '{value}' more than once")]
    DuplicateOptionValue { field_id: String, value: String },

    #[error("number field '{field_id}' has min {min} greater than max {max}")]
    InvalidNumberRange {
        field_id: String,
        min: String,
        max: String,
    },

    #[error("{path}: {rule_type} requires at least 2 conditions, found {found}")]
    TooFewConditions {
        path: String,
        rule_type: &'static str,
        found: usize,
    },

    #[error("{path}: condition group must contain at least one rule")]
    EmptyConditionGroup { path: String },

    #[error("calculation schema must contain at least one condition group")]
    NoConditionGroups,

    #[error("{path}: {rule_type} threshold {threshold} is outside {allowed}")]
    ThresholdOutOfRange {
        path: String,
        rule_type: &'static str,
        threshold: String,
        allowed: &'static str,
    },

    #[error("duplicate checklist item id '{item_id}'")]
    DuplicateChecklistItemId { item_id: String },

    #[error("checklist item '{item_id}' has an empty label")]
    EmptyItemLabel { item_id: String },

    #[error("checklist has no gradable items")]
    NoGradableItems,
}

impl SchemaError {
    /// Stable machine-readable code for the violation kind.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::DuplicateFieldId { .. } => "duplicate_field_id",
            SchemaError::EmptyIdentifier { .. } => "empty_identifier",
            SchemaError::UnknownFieldReference { .. } => "unknown_field_reference",
            SchemaError::SelfDependency { .. } => "self_dependency",
            SchemaError::DependencyCycle { .. } => "dependency_cycle",
            SchemaError::ConditionalValueNotAnOption { .. } => "conditional_value_not_an_option",
            SchemaError::MissingOptions { .. } => "missing_options",
            SchemaError::DuplicateOptionValue { .. } => "duplicate_option_value",
            SchemaError::InvalidNumberRange { .. } => "invalid_number_range",
            SchemaError::TooFewConditions { .. } => "too_few_conditions",
            SchemaError::EmptyConditionGroup { .. } => "empty_condition_group",
            SchemaError::NoConditionGroups => "no_condition_groups",
            SchemaError::ThresholdOutOfRange { .. } => "threshold_out_of_range",
            SchemaError::DuplicateChecklistItemId { .. } => "duplicate_checklist_item_id",
            SchemaError::EmptyItemLabel { .. } => "empty_item_label",
            SchemaError::NoGradableItems => "no_gradable_items",
        }
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
        })
    }
}

/// The complete list of violations found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaErrors(pub Vec<SchemaError>);

impl SchemaErrors {
    /// `Ok(())` when no violations were collected.
    pub fn into_result(errors: Vec<SchemaError>) -> Result<(), SchemaErrors> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaErrors(errors))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaError> {
        self.0.iter()
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::Value::Array(self.0.iter().map(SchemaError::to_json_value).collect())
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} schema violation(s)", self.0.len())?;
        for e in &self.0 {
            write!(f, "\n  - {}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}
