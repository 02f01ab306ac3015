//! Engine facade: evaluate one submission against one published indicator.
//!
//! The engine holds only configuration. Evaluation is synchronous and pure
//! over its inputs, so one `Engine` can be shared across threads freely.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use assay_core::{
    ChecklistItem, IndicatorDefinition, IndicatorStatus, ItemOutcome, OutcomeSources,
    ResponseRecord, ScoringMode, ValidationStrategy,
};

use crate::checklist::{calculate_status, ItemBreakdown, ItemResult, OutcomeTally};
use crate::config::EngineConfig;
use crate::facts::Facts;
use crate::remark::resolve_remark;
use crate::rules::eval_schema;
use crate::trace::EvalTrace;

// ──────────────────────────────────────────────
// Inputs
// ──────────────────────────────────────────────

/// Everything one response contributes to an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub record: ResponseRecord,
    #[serde(default)]
    pub facts: Facts,
    /// Assessor/validator decisions per checklist item id.
    #[serde(default)]
    pub item_decisions: BTreeMap<String, OutcomeSources>,
}

impl Submission {
    pub fn from_record(record: ResponseRecord) -> Self {
        Submission {
            record,
            ..Submission::default()
        }
    }

    pub fn with_facts(mut self, facts: Facts) -> Self {
        self.facts = facts;
        self
    }

    pub fn with_decision(mut self, item_id: impl Into<String>, sources: OutcomeSources) -> Self {
        self.item_decisions.insert(item_id.into(), sources);
        self
    }

    /// Resolved outcome for a checklist item. No decision recorded means
    /// `unknown`.
    pub fn item_outcome(&self, item_id: &str) -> ItemOutcome {
        self.item_decisions
            .get(item_id)
            .map(OutcomeSources::resolve)
            .unwrap_or(ItemOutcome::Unknown)
    }
}

// ──────────────────────────────────────────────
// Outputs
// ──────────────────────────────────────────────

/// Derived indicator status with its remark. `status == None` means not
/// yet evaluable, which callers must keep distinct from `FAIL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub status: Option<IndicatorStatus>,
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationEvaluation {
    pub result: IndicatorResult,
    pub passed: bool,
    pub trace: EvalTrace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEvaluation {
    pub result: IndicatorResult,
    pub tally: OutcomeTally,
    pub breakdown: Vec<ItemBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IndicatorEvaluation {
    Calculation(CalculationEvaluation),
    Checklist(ChecklistEvaluation),
}

impl IndicatorEvaluation {
    pub fn result(&self) -> &IndicatorResult {
        match self {
            IndicatorEvaluation::Calculation(c) => &c.result,
            IndicatorEvaluation::Checklist(c) => &c.result,
        }
    }

    pub fn into_result(self) -> IndicatorResult {
        match self {
            IndicatorEvaluation::Calculation(c) => c.result,
            IndicatorEvaluation::Checklist(c) => c.result,
        }
    }

    pub fn status(&self) -> Option<IndicatorStatus> {
        self.result().status
    }
}

// ──────────────────────────────────────────────
// Engine
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a submission, dispatching on the indicator's scoring mode.
    ///
    /// The definition is assumed to have passed validation at publish time;
    /// data problems in the submission never produce an error.
    pub fn evaluate(
        &self,
        definition: &IndicatorDefinition,
        submission: &Submission,
    ) -> IndicatorEvaluation {
        let evaluation = match &definition.scoring {
            ScoringMode::Calculation { schema } => {
                let outcome = eval_schema(schema, &submission.record, &submission.facts);
                IndicatorEvaluation::Calculation(CalculationEvaluation {
                    result: self.result(outcome.status, definition),
                    passed: outcome.passed,
                    trace: outcome.trace,
                })
            }
            ScoringMode::Checklist { items, strategy } => {
                let results = resolve_items(items, submission);
                IndicatorEvaluation::Checklist(self.calculate(definition, &results, strategy))
            }
        };

        tracing::debug!(
            indicator = %definition.code,
            version = definition.version,
            mode = definition.scoring.name(),
            status = ?evaluation.status(),
            "indicator evaluated"
        );
        evaluation
    }

    /// Checklist status calculation over already-resolved outcomes, with the
    /// remark attached.
    pub fn calculate(
        &self,
        definition: &IndicatorDefinition,
        results: &[ItemResult],
        strategy: &ValidationStrategy,
    ) -> ChecklistEvaluation {
        let computed = calculate_status(
            results,
            strategy,
            &definition.code,
            &self.config.physical_financial,
        );
        ChecklistEvaluation {
            result: self.result(computed.status, definition),
            tally: computed.tally,
            breakdown: computed.breakdown,
        }
    }

    fn result(
        &self,
        status: Option<IndicatorStatus>,
        definition: &IndicatorDefinition,
    ) -> IndicatorResult {
        IndicatorResult {
            status,
            remark: resolve_remark(status, definition, &self.config.remark_templates),
        }
    }
}

fn resolve_items(items: &[ChecklistItem], submission: &Submission) -> Vec<ItemResult> {
    items
        .iter()
        .map(|item| ItemResult::new(item.clone(), submission.item_outcome(&item.id)))
        .collect()
}
