//! Rule-tree evaluator.
//!
//! A pure function of `(rule, response record, facts)`. Data-shape
//! problems never raise: a missing field, a non-numeric value under a
//! numeric rule, or an unsupported shape makes the leaf rule evaluate to
//! `false` and is noted in the [`EvalTrace`].

use assay_core::{
    CalculationSchema, ConditionGroup, FieldValue, GroupOperator, IndicatorStatus, MatchOperator,
    ResponseRecord, Rule, Scalar,
};

use crate::facts::Facts;
use crate::numeric::{compare_decimals, expected_scalar, read_count, read_number};
use crate::trace::{EvalTrace, IssueKind};

/// Evaluate a rule without collecting a trace.
pub fn evaluate(rule: &Rule, record: &ResponseRecord, facts: &Facts) -> bool {
    eval_rule(rule, record, facts, &mut EvalTrace::new())
}

/// Evaluate one rule node. Composite nodes short-circuit.
pub fn eval_rule(
    rule: &Rule,
    record: &ResponseRecord,
    facts: &Facts,
    trace: &mut EvalTrace,
) -> bool {
    match rule {
        Rule::AndAll { conditions } => conditions
            .iter()
            .all(|c| eval_rule(c, record, facts, trace)),

        Rule::OrAny { conditions } => conditions
            .iter()
            .any(|c| eval_rule(c, record, facts, trace)),

        Rule::PercentageThreshold {
            field_id,
            operator,
            threshold,
        } => {
            let Some(value) = read_field(field_id, rule, record, trace) else {
                return false;
            };
            match read_number(value) {
                Some(n) => compare_decimals(n, *threshold, *operator),
                None => {
                    trace.record_issue(field_id, IssueKind::NotNumeric, rule.kind_name());
                    false
                }
            }
        }

        Rule::CountThreshold {
            field_id,
            operator,
            threshold,
        } => {
            trace.record_field(field_id);
            // Absent or non-list counts as zero elements.
            let count = match record.get(field_id) {
                None => {
                    trace.record_issue(field_id, IssueKind::Missing, rule.kind_name());
                    rust_decimal::Decimal::ZERO
                }
                Some(value) => read_count(value).unwrap_or_else(|| {
                    trace.record_issue(field_id, IssueKind::NotList, rule.kind_name());
                    rust_decimal::Decimal::ZERO
                }),
            };
            compare_decimals(count, *threshold, *operator)
        }

        Rule::MatchValue {
            field_id,
            operator,
            expected_value,
        } => {
            let Some(value) = read_field(field_id, rule, record, trace) else {
                return false;
            };
            match eval_match(value, *operator, expected_value) {
                Some(result) => result,
                None => {
                    trace.record_issue(field_id, IssueKind::NotMatchable, rule.kind_name());
                    false
                }
            }
        }

        Rule::BbiFunctionalityCheck {
            bbi_id,
            expected_status,
        } => match facts.bbi_status(bbi_id) {
            Some(actual) => actual == *expected_status,
            None => {
                tracing::warn!(bbi_id = %bbi_id, "no functionality fact supplied for BBI");
                trace.record_issue(bbi_id, IssueKind::MissingFact, rule.kind_name());
                false
            }
        },
    }
}

/// Evaluate a condition group: its operator applied over its rules.
pub fn eval_group(
    group: &ConditionGroup,
    record: &ResponseRecord,
    facts: &Facts,
    trace: &mut EvalTrace,
) -> bool {
    match group.operator {
        GroupOperator::And => group
            .rules
            .iter()
            .all(|r| eval_rule(r, record, facts, trace)),
        GroupOperator::Or => group
            .rules
            .iter()
            .any(|r| eval_rule(r, record, facts, trace)),
    }
}

/// Result of evaluating a calculation schema against one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOutcome {
    /// `None` when the indicator is not yet evaluable.
    pub status: Option<IndicatorStatus>,
    pub passed: bool,
    pub trace: EvalTrace,
}

/// Evaluate a calculation schema. Condition groups are AND-combined.
///
/// Not yet evaluable (`status == None`) when the schema has no condition
/// groups, or when it reads response fields and the record has none.
pub fn eval_schema(
    schema: &CalculationSchema,
    record: &ResponseRecord,
    facts: &Facts,
) -> SchemaOutcome {
    let mut trace = EvalTrace::new();

    let reads_fields = !schema.referenced_fields().is_empty();
    if schema.condition_groups.is_empty() || (reads_fields && record.is_empty()) {
        return SchemaOutcome {
            status: None,
            passed: false,
            trace,
        };
    }

    let passed = schema
        .condition_groups
        .iter()
        .all(|g| eval_group(g, record, facts, &mut trace));

    let status = if passed {
        schema.status_on_pass
    } else {
        schema.status_on_fail
    };

    SchemaOutcome {
        status: Some(status),
        passed,
        trace,
    }
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn read_field<'r>(
    field_id: &str,
    rule: &Rule,
    record: &'r ResponseRecord,
    trace: &mut EvalTrace,
) -> Option<&'r FieldValue> {
    trace.record_field(field_id);
    let value = record.get(field_id);
    if value.is_none() {
        trace.record_issue(field_id, IssueKind::Missing, rule.kind_name());
    }
    value
}

/// `None` means the operator is not meaningful for this value shape.
fn eval_match(
    value: &FieldValue,
    operator: MatchOperator,
    expected: &serde_json::Value,
) -> Option<bool> {
    match operator {
        MatchOperator::Eq => exact_match(value, expected),
        MatchOperator::Ne => exact_match(value, expected).map(|eq| !eq),
        MatchOperator::Contains => contains(value, expected),
        MatchOperator::NotContains => contains(value, expected).map(|c| !c),
    }
}

fn exact_match(value: &FieldValue, expected: &serde_json::Value) -> Option<bool> {
    match value {
        FieldValue::Scalar(actual) => {
            Some(expected_scalar(expected).is_some_and(|e| actual.matches(&e)))
        }
        FieldValue::List(actual) => Some(match FieldValue::from_json(expected) {
            // Multi-select answers compare as sets.
            Some(FieldValue::List(wanted)) => {
                same_members(actual, &wanted) && same_members(&wanted, actual)
            }
            _ => false,
        }),
        FieldValue::Structured(_) => None,
    }
}

fn contains(value: &FieldValue, expected: &serde_json::Value) -> Option<bool> {
    match value {
        FieldValue::Scalar(Scalar::Text(text)) => match expected {
            serde_json::Value::String(needle) => Some(text.contains(needle.as_str())),
            _ => None,
        },
        FieldValue::List(items) => match FieldValue::from_json(expected) {
            Some(FieldValue::Scalar(needle)) => Some(items.iter().any(|i| i.matches(&needle))),
            Some(FieldValue::List(needles)) => Some(same_members(&needles, items)),
            _ => None,
        },
        FieldValue::Scalar(_) | FieldValue::Structured(_) => None,
    }
}

/// Every element of `subset` appears in `superset`.
fn same_members(subset: &[Scalar], superset: &[Scalar]) -> bool {
    subset
        .iter()
        .all(|s| superset.iter().any(|t| t.matches(s)))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assay_core::BbiStatus;
    use serde_json::json;

    fn record(v: serde_json::Value) -> ResponseRecord {
        serde_json::from_value(v).unwrap()
    }

    fn rule(v: serde_json::Value) -> Rule {
        serde_json::from_value(v).unwrap()
    }

    fn pct(field: &str, op: &str, threshold: i64) -> serde_json::Value {
        json!({"rule_type": "PERCENTAGE_THRESHOLD", "field_id": field,
               "operator": op, "threshold": threshold})
    }

    fn count(field: &str, op: &str, threshold: i64) -> serde_json::Value {
        json!({"rule_type": "COUNT_THRESHOLD", "field_id": field,
               "operator": op, "threshold": threshold})
    }

    fn matching(field: &str, op: &str, expected: serde_json::Value) -> serde_json::Value {
        json!({"rule_type": "MATCH_VALUE", "field_id": field,
               "operator": op, "expected_value": expected})
    }

    #[test]
    fn percentage_threshold_compares() {
        let r = rule(pct("rate", ">=", 75));
        assert!(evaluate(&r, &record(json!({"rate": 85})), &Facts::new()));
        assert!(evaluate(&r, &record(json!({"rate": "75"})), &Facts::new()));
        assert!(!evaluate(&r, &record(json!({"rate": 74.9})), &Facts::new()));
    }

    #[test]
    fn percentage_threshold_fails_closed() {
        let facts = Facts::new();
        for op in [">=", ">", "<=", "<", "==", "!="] {
            let r = rule(pct("rate", op, 50));
            let mut trace = EvalTrace::new();
            assert!(!eval_rule(&r, &record(json!({})), &facts, &mut trace), "{}", op);
            assert_eq!(trace.issues[0].kind, IssueKind::Missing);

            let mut trace = EvalTrace::new();
            assert!(!eval_rule(&r, &record(json!({"rate": "n/a"})), &facts, &mut trace));
            assert_eq!(trace.issues[0].kind, IssueKind::NotNumeric);
        }
    }

    #[test]
    fn count_threshold_counts_list_elements() {
        let r = rule(count("docs", ">=", 3));
        assert!(evaluate(&r, &record(json!({"docs": ["a", "b", "c"]})), &Facts::new()));
        assert!(!evaluate(&r, &record(json!({"docs": ["a", "b"]})), &Facts::new()));
    }

    #[test]
    fn count_threshold_treats_absent_and_scalars_as_zero() {
        let at_most_two = rule(count("docs", "<=", 2));
        let mut trace = EvalTrace::new();
        assert!(eval_rule(&at_most_two, &record(json!({})), &Facts::new(), &mut trace));
        assert_eq!(trace.issues[0].kind, IssueKind::Missing);

        let mut trace = EvalTrace::new();
        let r = rule(count("docs", ">=", 1));
        assert!(!eval_rule(&r, &record(json!({"docs": "a.pdf"})), &Facts::new(), &mut trace));
        assert_eq!(trace.issues[0].kind, IssueKind::NotList);
    }

    #[test]
    fn match_value_exact() {
        let f = Facts::new();
        let eq = rule(matching("answer", "==", json!("yes")));
        let ne = rule(matching("answer", "!=", json!("yes")));
        assert!(evaluate(&eq, &record(json!({"answer": "yes"})), &f));
        assert!(!evaluate(&eq, &record(json!({"answer": "Yes"})), &f));
        assert!(evaluate(&ne, &record(json!({"answer": "no"})), &f));
        // Absent fields never hold, whatever the operator.
        assert!(!evaluate(&ne, &record(json!({})), &f));

        let num = rule(matching("n", "==", json!(3)));
        assert!(evaluate(&num, &record(json!({"n": 3.0})), &f));
    }

    #[test]
    fn match_value_lists_compare_as_sets() {
        let f = Facts::new();
        let eq = rule(matching("tags", "==", json!(["b", "a"])));
        assert!(evaluate(&eq, &record(json!({"tags": ["a", "b"]})), &f));
        assert!(!evaluate(&eq, &record(json!({"tags": ["a"]})), &f));
    }

    #[test]
    fn match_value_contains() {
        let f = Facts::new();
        let c = rule(matching("v", "contains", json!("plan")));
        let nc = rule(matching("v", "not_contains", json!("plan")));

        assert!(evaluate(&c, &record(json!({"v": "approved plan"})), &f));
        assert!(evaluate(&c, &record(json!({"v": ["plan", "budget"]})), &f));
        assert!(!evaluate(&c, &record(json!({"v": ["planning"]})), &f));
        assert!(evaluate(&nc, &record(json!({"v": "budget"})), &f));
        assert!(evaluate(&nc, &record(json!({"v": ["budget"]})), &f));

        // Not meaningful on numbers: false for both operators.
        let mut trace = EvalTrace::new();
        assert!(!eval_rule(&c, &record(json!({"v": 5})), &f, &mut trace));
        assert!(!eval_rule(&nc, &record(json!({"v": 5})), &f, &mut trace));
        assert_eq!(trace.issues.len(), 2);
        assert!(trace.issues.iter().all(|i| i.kind == IssueKind::NotMatchable));
    }

    #[test]
    fn bbi_check_reads_facts() {
        let r = rule(json!({"rule_type": "BBI_FUNCTIONALITY_CHECK", "bbi_id": "BDRRMC",
                            "expected_status": "Functional"}));
        let empty = record(json!({}));
        let functional = Facts::new().with_bbi("BDRRMC", BbiStatus::Functional);
        let non = Facts::new().with_bbi("BDRRMC", BbiStatus::NonFunctional);
        assert!(evaluate(&r, &empty, &functional));
        assert!(!evaluate(&r, &empty, &non));

        let mut trace = EvalTrace::new();
        assert!(!eval_rule(&r, &empty, &Facts::new(), &mut trace));
        assert_eq!(trace.issues[0].kind, IssueKind::MissingFact);
    }

    #[test]
    fn composites_short_circuit() {
        let r = rule(json!({"rule_type": "OR_ANY", "conditions": [
            pct("a", ">=", 1), pct("b", ">=", 1)
        ]}));
        let mut trace = EvalTrace::new();
        assert!(eval_rule(&r, &record(json!({"a": 5})), &Facts::new(), &mut trace));
        assert_eq!(trace.fields_read, vec!["a".to_string()]);

        let r = rule(json!({"rule_type": "AND_ALL", "conditions": [
            pct("a", ">=", 10), pct("b", ">=", 1)
        ]}));
        let mut trace = EvalTrace::new();
        assert!(!eval_rule(&r, &record(json!({"a": 5, "b": 5})), &Facts::new(), &mut trace));
        assert_eq!(trace.fields_read, vec!["a".to_string()]);
    }

    #[test]
    fn schema_groups_are_and_combined() {
        let schema: CalculationSchema = serde_json::from_value(json!({
            "condition_groups": [
                {"operator": "OR", "rules": [pct("a", ">=", 50), pct("b", ">=", 50)]},
                {"operator": "AND", "rules": [count("docs", ">=", 1)]}
            ],
            "status_on_pass": "PASS",
            "status_on_fail": "CONDITIONAL"
        }))
        .unwrap();

        let ok = eval_schema(&schema, &record(json!({"b": 60, "docs": ["x"]})), &Facts::new());
        assert_eq!(ok.status, Some(IndicatorStatus::Pass));
        assert!(ok.passed);

        let ko = eval_schema(&schema, &record(json!({"b": 60})), &Facts::new());
        assert_eq!(ko.status, Some(IndicatorStatus::Conditional));
        assert!(!ko.passed);
    }

    #[test]
    fn schema_without_data_is_not_evaluable() {
        let schema: CalculationSchema = serde_json::from_value(json!({
            "condition_groups": [{"operator": "AND", "rules": [pct("a", ">=", 50)]}]
        }))
        .unwrap();
        assert_eq!(eval_schema(&schema, &record(json!({})), &Facts::new()).status, None);

        let empty: CalculationSchema =
            serde_json::from_value(json!({"condition_groups": []})).unwrap();
        assert_eq!(eval_schema(&empty, &record(json!({"a": 1})), &Facts::new()).status, None);
    }

    #[test]
    fn facts_only_schema_evaluates_on_empty_record() {
        let schema: CalculationSchema = serde_json::from_value(json!({
            "condition_groups": [{"operator": "AND", "rules": [
                {"rule_type": "BBI_FUNCTIONALITY_CHECK", "bbi_id": "VAWC",
                 "expected_status": "Functional"}
            ]}]
        }))
        .unwrap();
        let facts = Facts::new().with_bbi("VAWC", BbiStatus::Functional);
        let out = eval_schema(&schema, &record(json!({})), &facts);
        assert_eq!(out.status, Some(IndicatorStatus::Pass));
    }
}
