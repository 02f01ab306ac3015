//! Checklist model: items, per-item outcomes, and validation strategies.

use std::fmt;

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Items
// ──────────────────────────────────────────────

/// Kind of checklist item. `info_text` items are display-only.
///
/// Item kinds are an open set: any name not listed here parses as `Other`
/// and is graded like a checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Checkbox,
    DocumentCount,
    CalculationField,
    AssessmentField,
    InfoText,
    DateInput,
    #[serde(other)]
    Other,
}

impl ItemType {
    /// Whether items of this kind take part in status calculation.
    pub fn is_gradable(self) -> bool {
        !matches!(self, ItemType::InfoText)
    }
}

/// An atomic, independently gradable sub-requirement of an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    #[serde(default = "default_item_type")]
    pub item_type: ItemType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_group: Option<String>,
}

fn default_item_type() -> ItemType {
    ItemType::Checkbox
}

fn default_required() -> bool {
    true
}

impl ChecklistItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, item_type: ItemType) -> Self {
        ChecklistItem {
            id: id.into(),
            label: label.into(),
            item_type,
            required: true,
            group_name: None,
            option_group: None,
        }
    }
}

// ──────────────────────────────────────────────
// Outcomes
// ──────────────────────────────────────────────

/// Resolved per-item result consumed by the status calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOutcome {
    Met,
    Unmet,
    Unknown,
}

impl ItemOutcome {
    pub fn from_met(met: bool) -> Self {
        if met {
            ItemOutcome::Met
        } else {
            ItemOutcome::Unmet
        }
    }
}

/// The two independent decisions recorded for a checklist item.
///
/// A validator's decision overrides the assessor's; with neither present
/// the item is `unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessor: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<bool>,
}

impl OutcomeSources {
    pub fn resolve(&self) -> ItemOutcome {
        match self.validator.or(self.assessor) {
            Some(met) => ItemOutcome::from_met(met),
            None => ItemOutcome::Unknown,
        }
    }
}

// ──────────────────────────────────────────────
// Strategies
// ──────────────────────────────────────────────

/// Named rule for reducing item outcomes to an indicator status.
///
/// Names that are not recognized are kept verbatim so they can be reported;
/// the calculator treats them as [`ValidationStrategy::AllItemsRequired`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValidationStrategy {
    AllItemsRequired,
    AnyItemRequired,
    OrLogicAtLeast1Required,
    SharedPlusOrLogic,
    Unrecognized(String),
}

impl ValidationStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            ValidationStrategy::AllItemsRequired => "ALL_ITEMS_REQUIRED",
            ValidationStrategy::AnyItemRequired => "ANY_ITEM_REQUIRED",
            ValidationStrategy::OrLogicAtLeast1Required => "OR_LOGIC_AT_LEAST_1_REQUIRED",
            ValidationStrategy::SharedPlusOrLogic => "SHARED_PLUS_OR_LOGIC",
            ValidationStrategy::Unrecognized(name) => name,
        }
    }
}

impl Default for ValidationStrategy {
    fn default() -> Self {
        ValidationStrategy::AllItemsRequired
    }
}

impl From<String> for ValidationStrategy {
    fn from(name: String) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "ALL_ITEMS_REQUIRED" => ValidationStrategy::AllItemsRequired,
            "ANY_ITEM_REQUIRED" => ValidationStrategy::AnyItemRequired,
            "OR_LOGIC_AT_LEAST_1_REQUIRED" => ValidationStrategy::OrLogicAtLeast1Required,
            "SHARED_PLUS_OR_LOGIC" => ValidationStrategy::SharedPlusOrLogic,
            _ => ValidationStrategy::Unrecognized(name),
        }
    }
}

impl From<&str> for ValidationStrategy {
    fn from(name: &str) -> Self {
        ValidationStrategy::from(name.to_string())
    }
}

impl From<ValidationStrategy> for String {
    fn from(strategy: ValidationStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

impl fmt::Display for ValidationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
