//! Evaluation trace: which fields a rule tree read and which data issues
//! made a rule fail closed.
//!
//! Issues never change an outcome. They exist so a caller can explain why
//! an indicator failed ("completion_rate was not numeric") without the
//! evaluator ever raising.

use std::fmt;

use serde::Serialize;

/// Why a leaf rule could not hold on the data it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The field is absent from the response record.
    Missing,
    /// A numeric rule read a value that is not a number.
    NotNumeric,
    /// A count rule read a value that is not a list.
    NotList,
    /// `contains`/`not_contains` on a value that is neither text nor list,
    /// or an exact match against an unsupported shape.
    NotMatchable,
    /// No caller-supplied fact for the referenced subject.
    MissingFact,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueKind::Missing => "missing",
            IssueKind::NotNumeric => "not numeric",
            IssueKind::NotList => "not a list",
            IssueKind::NotMatchable => "not matchable",
            IssueKind::MissingFact => "missing fact",
        };
        f.write_str(s)
    }
}

/// One data issue observed during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataIssue {
    /// Field id, or BBI id for [`IssueKind::MissingFact`].
    pub subject: String,
    pub kind: IssueKind,
    pub rule_type: &'static str,
}

/// Collector threaded through rule evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvalTrace {
    pub fields_read: Vec<String>,
    pub issues: Vec<DataIssue>,
}

impl EvalTrace {
    pub fn new() -> Self {
        EvalTrace::default()
    }

    /// Record a field access (first read only).
    pub fn record_field(&mut self, field_id: &str) {
        if !self.fields_read.iter().any(|f| f == field_id) {
            self.fields_read.push(field_id.to_string());
        }
    }

    pub fn record_issue(&mut self, subject: &str, kind: IssueKind, rule_type: &'static str) {
        tracing::debug!(subject, issue = %kind, rule_type, "rule fails closed on data issue");
        self.issues.push(DataIssue {
            subject: subject.to_string(),
            kind,
            rule_type,
        });
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
