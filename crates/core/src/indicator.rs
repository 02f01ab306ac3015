//! Indicator definitions: the published unit of scoring.

use serde::{Deserialize, Serialize};

use crate::checklist::{ChecklistItem, ValidationStrategy};
use crate::field::FieldSchema;
use crate::remark::RemarkSchema;
use crate::rule::CalculationSchema;

/// How an indicator is scored. Exactly one mode is active per indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScoringMode {
    /// Rule-tree evaluation over the response record.
    Calculation { schema: CalculationSchema },
    /// Named strategy over resolved checklist item outcomes.
    Checklist {
        items: Vec<ChecklistItem>,
        #[serde(default)]
        strategy: ValidationStrategy,
    },
}

impl ScoringMode {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringMode::Calculation { .. } => "calculation",
            ScoringMode::Checklist { .. } => "checklist",
        }
    }
}

/// A governance indicator as published. `version` identifies the schema
/// snapshot that responses were submitted against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDefinition {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub fields: FieldSchema,
    pub scoring: ScoringMode,
    #[serde(default)]
    pub remarks: RemarkSchema,
}

fn default_version() -> u32 {
    1
}

impl IndicatorDefinition {
    /// Parse a definition document.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}
