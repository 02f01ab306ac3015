//! assay-core: rule model, field schema, and publish-time validation for
//! the compliance determination engine.
//!
//! This crate holds the data model every other part of the engine shares
//! and the strict authoring checks that run before an indicator schema is
//! published. It performs no evaluation; see `assay-eval` for that.
//!
//! # Public API
//!
//! - Rule Model: [`Rule`], [`ConditionGroup`], [`CalculationSchema`]
//! - Form model: [`FieldSchema`], [`FieldDefinition`], [`FieldType`]
//! - Checklist model: [`ChecklistItem`], [`ItemOutcome`],
//!   [`OutcomeSources`], [`ValidationStrategy`]
//! - Response data: [`ResponseRecord`], [`FieldValue`], [`Scalar`]
//! - [`IndicatorDefinition`] with its [`ScoringMode`] and [`RemarkSchema`]
//! - [`validate()`] and friends, returning every [`SchemaError`] at once

pub mod checklist;
pub mod error;
pub mod field;
pub mod indicator;
pub mod remark;
pub mod rule;
pub mod validate;
pub mod value;

// ── Convenience re-exports: model types ──────────────────────────────

pub use checklist::{ChecklistItem, ItemOutcome, ItemType, OutcomeSources, ValidationStrategy};
pub use error::{SchemaError, SchemaErrors};
pub use field::{ConditionalRequirement, FieldDefinition, FieldOption, FieldSchema, FieldType};
pub use indicator::{IndicatorDefinition, ScoringMode};
pub use remark::RemarkSchema;
pub use rule::{
    BbiStatus, CalculationSchema, ComparisonOperator, ConditionGroup, GroupOperator,
    IndicatorStatus, MatchOperator, Rule,
};
pub use value::{FieldValue, ResponseRecord, Scalar};

// ── Convenience re-exports: validation entry points ──────────────────

pub use validate::{
    validate, validate_calculation, validate_checklist, validate_fields, validate_indicator,
};
