//! assay-eval: evaluation side of the compliance determination engine.
//!
//! Takes an indicator definition that passed publish-time validation
//! (`assay-core`) and derives its status from one response:
//!
//! - calculation mode: the rule tree is evaluated over the response record
//!   and caller-supplied [`Facts`] ([`rules`])
//! - checklist mode: resolved item outcomes are reduced by the indicator's
//!   validation strategy ([`checklist`])
//!
//! Statuses roll up per governance area through [`aggregate()`]. Data
//! problems never raise: a rule that cannot hold on its data fails closed
//! and the reason is recorded in an [`EvalTrace`].
//!
//! # Public API
//!
//! - [`Engine::evaluate`] for one submission
//! - [`Recalculator`] for caller-triggered batches over a [`ResultCache`]
//! - [`aggregate()`] / [`aggregate_labels`] for area verdicts
//! - [`EngineConfig`] for the Physical/Financial override set and remark
//!   templates

pub mod aggregate;
pub mod batch;
pub mod cache;
pub mod checklist;
pub mod config;
pub mod engine;
pub mod facts;
pub mod numeric;
pub mod remark;
pub mod rules;
pub mod trace;

pub use aggregate::{aggregate, aggregate_labels, AreaResult};
pub use batch::{BatchReport, Recalculator};
pub use cache::{CacheError, CacheKey, InMemoryResultCache, ResultCache};
pub use checklist::{calculate_status, ChecklistStatus, ItemBreakdown, ItemResult, OutcomeTally};
pub use config::{ConfigError, EngineConfig, PhysicalFinancialOverride, RemarkTemplates};
pub use engine::{
    CalculationEvaluation, ChecklistEvaluation, Engine, IndicatorEvaluation, IndicatorResult,
    Submission,
};
pub use facts::Facts;
pub use remark::resolve_remark;
pub use rules::{eval_schema, evaluate, SchemaOutcome};
pub use trace::{DataIssue, EvalTrace, IssueKind};
