//! Rule Model: the recursive rule tree and the calculation schema built on it.
//!
//! JSON shape uses `rule_type` as the discriminator:
//!
//! ```json
//! { "rule_type": "AND_ALL", "conditions": [
//!     { "rule_type": "PERCENTAGE_THRESHOLD", "field_id": "completion_rate",
//!       "operator": ">=", "threshold": 75 },
//!     { "rule_type": "COUNT_THRESHOLD", "field_id": "required_documents",
//!       "operator": ">=", "threshold": 3 } ] }
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Statuses
// ──────────────────────────────────────────────

/// Indicator-level compliance status. "Not yet evaluable" is modeled as
/// `Option::None` by callers, never as a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorStatus {
    Pass,
    Fail,
    Conditional,
}

impl IndicatorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorStatus::Pass => "PASS",
            IndicatorStatus::Fail => "FAIL",
            IndicatorStatus::Conditional => "CONDITIONAL",
        }
    }

    /// Parse a status label, case-insensitively. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<IndicatorStatus> {
        match label.trim().to_ascii_uppercase().as_str() {
            "PASS" | "PASSED" => Some(IndicatorStatus::Pass),
            "FAIL" | "FAILED" => Some(IndicatorStatus::Fail),
            "CONDITIONAL" => Some(IndicatorStatus::Conditional),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Functional status of a Barangay-Based Institution, resolved by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BbiStatus {
    Functional,
    #[serde(rename = "Non-Functional")]
    NonFunctional,
}

impl fmt::Display for BbiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BbiStatus::Functional => f.write_str("Functional"),
            BbiStatus::NonFunctional => f.write_str("Non-Functional"),
        }
    }
}

// ──────────────────────────────────────────────
// Operators
// ──────────────────────────────────────────────

/// Numeric comparison used by the threshold rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl ComparisonOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Eq => "==",
            ComparisonOperator::Ne => "!=",
        }
    }
}

/// Operators for `MATCH_VALUE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOperator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not_contains")]
    NotContains,
}

impl MatchOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchOperator::Eq => "==",
            MatchOperator::Ne => "!=",
            MatchOperator::Contains => "contains",
            MatchOperator::NotContains => "not_contains",
        }
    }
}

/// Combinator for a [`ConditionGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    And,
    Or,
}

// ──────────────────────────────────────────────
// Rule tree
// ──────────────────────────────────────────────

/// A node of the rule tree. Composite nodes own their children directly;
/// the `Vec` provides the indirection that keeps the type finitely sized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    AndAll {
        conditions: Vec<Rule>,
    },
    OrAny {
        conditions: Vec<Rule>,
    },
    PercentageThreshold {
        field_id: String,
        operator: ComparisonOperator,
        #[serde(with = "rust_decimal::serde::float")]
        threshold: Decimal,
    },
    CountThreshold {
        field_id: String,
        operator: ComparisonOperator,
        #[serde(with = "rust_decimal::serde::float")]
        threshold: Decimal,
    },
    MatchValue {
        field_id: String,
        operator: MatchOperator,
        expected_value: serde_json::Value,
    },
    BbiFunctionalityCheck {
        bbi_id: String,
        expected_status: BbiStatus,
    },
}

impl Rule {
    /// Discriminator name as it appears in JSON.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Rule::AndAll { .. } => "AND_ALL",
            Rule::OrAny { .. } => "OR_ANY",
            Rule::PercentageThreshold { .. } => "PERCENTAGE_THRESHOLD",
            Rule::CountThreshold { .. } => "COUNT_THRESHOLD",
            Rule::MatchValue { .. } => "MATCH_VALUE",
            Rule::BbiFunctionalityCheck { .. } => "BBI_FUNCTIONALITY_CHECK",
        }
    }

    /// The response field this rule reads, if it reads one directly.
    pub fn field_id(&self) -> Option<&str> {
        match self {
            Rule::PercentageThreshold { field_id, .. }
            | Rule::CountThreshold { field_id, .. }
            | Rule::MatchValue { field_id, .. } => Some(field_id),
            _ => None,
        }
    }

    /// Every field id referenced anywhere in this subtree, in tree order.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Rule::AndAll { conditions } | Rule::OrAny { conditions } => {
                for c in conditions {
                    c.collect_fields(out);
                }
            }
            other => {
                if let Some(id) = other.field_id() {
                    out.push(id);
                }
            }
        }
    }
}

// ──────────────────────────────────────────────
// Condition groups and calculation schema
// ──────────────────────────────────────────────

/// A list of rules combined with one operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub operator: GroupOperator,
    pub rules: Vec<Rule>,
}

fn default_pass() -> IndicatorStatus {
    IndicatorStatus::Pass
}

fn default_fail() -> IndicatorStatus {
    IndicatorStatus::Fail
}

/// Declarative scoring for an indicator. All condition groups are
/// AND-combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSchema {
    pub condition_groups: Vec<ConditionGroup>,
    #[serde(default = "default_pass")]
    pub status_on_pass: IndicatorStatus,
    #[serde(default = "default_fail")]
    pub status_on_fail: IndicatorStatus,
}

impl CalculationSchema {
    pub fn referenced_fields(&self) -> Vec<&str> {
        self.condition_groups
            .iter()
            .flat_map(|g| g.rules.iter())
            .flat_map(Rule::referenced_fields)
            .collect()
    }
}
