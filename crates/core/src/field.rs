//! Field schema: the form fields an indicator's response record answers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

/// Type-specific configuration of a field, tagged by `field_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field_type", rename_all = "snake_case")]
pub enum FieldType {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
    },
    Number {
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "rust_decimal::serde::float_option"
        )]
        min: Option<Decimal>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "rust_decimal::serde::float_option"
        )]
        max: Option<Decimal>,
    },
    Date,
    SingleChoice {
        options: Vec<FieldOption>,
    },
    MultiChoice {
        options: Vec<FieldOption>,
    },
    Checkbox {
        options: Vec<FieldOption>,
    },
    FileUpload,
    SectionHeader,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text { .. } => "text",
            FieldType::Number { .. } => "number",
            FieldType::Date => "date",
            FieldType::SingleChoice { .. } => "single_choice",
            FieldType::MultiChoice { .. } => "multi_choice",
            FieldType::Checkbox { .. } => "checkbox",
            FieldType::FileUpload => "file_upload",
            FieldType::SectionHeader => "section_header",
        }
    }

    /// Declared options for single/multi-choice fields.
    pub fn options(&self) -> Option<&[FieldOption]> {
        match self {
            FieldType::SingleChoice { options }
            | FieldType::MultiChoice { options }
            | FieldType::Checkbox { options } => Some(options),
            _ => None,
        }
    }
}

/// "This field is required when `field_id` holds `expected_value`."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRequirement {
    pub field_id: String,
    pub expected_value: serde_json::Value,
}

/// One field of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub field_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_requirement: Option<ConditionalRequirement>,
}

/// Ordered list of field definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    pub fields: Vec<FieldDefinition>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        FieldSchema { fields }
    }

    /// First field with the given id.
    pub fn get(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.get(field_id).is_some()
    }
}
