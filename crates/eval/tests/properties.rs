//! Property tests for the rule evaluator and the checklist/area reducers.
//!
//!   A. AND_ALL / OR_ANY agree with every/some over their children
//!   B. PERCENTAGE_THRESHOLD fails closed on missing or non-numeric data
//!   C. Evaluation is deterministic
//!   D. Strategy and aggregation laws over arbitrary outcome lists

use assay_core::{
    BbiStatus, ChecklistItem, ComparisonOperator, IndicatorStatus, ItemOutcome, ItemType,
    MatchOperator, ResponseRecord, Rule, ValidationStrategy,
};
use assay_eval::{aggregate, calculate_status, evaluate, Facts, ItemResult, PhysicalFinancialOverride};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;

// ──────────────────────────────────────────────
// Strategies
// ──────────────────────────────────────────────

const FIELDS: [&str; 3] = ["rate", "docs", "answer"];

fn comparison_operator() -> impl Strategy<Value = ComparisonOperator> {
    prop_oneof![
        Just(ComparisonOperator::Gte),
        Just(ComparisonOperator::Gt),
        Just(ComparisonOperator::Lte),
        Just(ComparisonOperator::Lt),
        Just(ComparisonOperator::Eq),
        Just(ComparisonOperator::Ne),
    ]
}

fn match_operator() -> impl Strategy<Value = MatchOperator> {
    prop_oneof![
        Just(MatchOperator::Eq),
        Just(MatchOperator::Ne),
        Just(MatchOperator::Contains),
        Just(MatchOperator::NotContains),
    ]
}

fn leaf_rule() -> impl Strategy<Value = Rule> {
    prop_oneof![
        (comparison_operator(), 0u32..=100).prop_map(|(operator, t)| Rule::PercentageThreshold {
            field_id: "rate".into(),
            operator,
            threshold: Decimal::from(t),
        }),
        (comparison_operator(), 0u32..6).prop_map(|(operator, t)| Rule::CountThreshold {
            field_id: "docs".into(),
            operator,
            threshold: Decimal::from(t),
        }),
        (match_operator(), prop_oneof![Just("yes"), Just("no")]).prop_map(|(operator, v)| {
            Rule::MatchValue {
                field_id: "answer".into(),
                operator,
                expected_value: json!(v),
            }
        }),
        prop_oneof![Just(BbiStatus::Functional), Just(BbiStatus::NonFunctional)].prop_map(
            |expected_status| Rule::BbiFunctionalityCheck {
                bbi_id: "BDRRMC".into(),
                expected_status,
            }
        ),
    ]
}

fn rule_tree() -> impl Strategy<Value = Rule> {
    leaf_rule().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4)
                .prop_map(|conditions| Rule::AndAll { conditions }),
            prop::collection::vec(inner, 2..4).prop_map(|conditions| Rule::OrAny { conditions }),
        ]
    })
}

/// Records with each field independently present, absent, or ill-typed.
fn record() -> impl Strategy<Value = ResponseRecord> {
    let rate = prop_oneof![
        Just(json!(null)),
        (0u32..=100).prop_map(|n| json!(n)),
        Just(json!("n/a")),
        Just(json!(["x"])),
    ];
    let docs = prop_oneof![
        Just(json!(null)),
        prop::collection::vec("[a-z]{1,3}", 0..6).prop_map(|v| json!(v)),
        Just(json!("one file")),
    ];
    let answer = prop_oneof![
        Just(json!(null)),
        Just(json!("yes")),
        Just(json!("no")),
        Just(json!(["yes", "maybe"])),
        Just(json!(7)),
    ];
    (rate, docs, answer).prop_map(|(r, d, a)| {
        let mut record = ResponseRecord::new();
        for (field, value) in FIELDS.iter().zip([r, d, a]) {
            record.insert_json(*field, &value);
        }
        record
    })
}

fn facts() -> impl Strategy<Value = Facts> {
    prop_oneof![
        Just(Facts::new()),
        Just(Facts::new().with_bbi("BDRRMC", BbiStatus::Functional)),
        Just(Facts::new().with_bbi("BDRRMC", BbiStatus::NonFunctional)),
    ]
}

fn outcome() -> impl Strategy<Value = ItemOutcome> {
    prop_oneof![
        Just(ItemOutcome::Met),
        Just(ItemOutcome::Unmet),
        Just(ItemOutcome::Unknown),
    ]
}

fn items(outcomes: &[ItemOutcome]) -> Vec<ItemResult> {
    outcomes
        .iter()
        .enumerate()
        .map(|(i, o)| {
            ItemResult::new(
                ChecklistItem::new(format!("i{}", i), format!("Item {}", i), ItemType::Checkbox),
                *o,
            )
        })
        .collect()
}

fn status_of(outcomes: &[ItemOutcome], strategy: ValidationStrategy) -> Option<IndicatorStatus> {
    calculate_status(
        &items(outcomes),
        &strategy,
        "9.9.9",
        &PhysicalFinancialOverride::default(),
    )
    .status
}

// ──────────────────────────────────────────────
// Properties
// ──────────────────────────────────────────────

proptest! {
    #[test]
    fn and_all_is_every(rules in prop::collection::vec(rule_tree(), 2..5), rec in record(), f in facts()) {
        let expected = rules.iter().all(|r| evaluate(r, &rec, &f));
        let tree = Rule::AndAll { conditions: rules };
        prop_assert_eq!(evaluate(&tree, &rec, &f), expected);
    }

    #[test]
    fn or_any_is_some(rules in prop::collection::vec(rule_tree(), 2..5), rec in record(), f in facts()) {
        let expected = rules.iter().any(|r| evaluate(r, &rec, &f));
        let tree = Rule::OrAny { conditions: rules };
        prop_assert_eq!(evaluate(&tree, &rec, &f), expected);
    }

    #[test]
    fn percentage_fails_closed(
        operator in comparison_operator(),
        threshold in 0u32..=100,
        bad in prop_oneof![Just(json!(null)), Just(json!("abc")), Just(json!(true)), Just(json!(["50"]))],
    ) {
        let mut rec = ResponseRecord::new();
        rec.insert_json("rate", &bad);
        let rule = Rule::PercentageThreshold {
            field_id: "rate".into(),
            operator,
            threshold: Decimal::from(threshold),
        };
        prop_assert!(!evaluate(&rule, &rec, &Facts::new()));
    }

    #[test]
    fn evaluation_is_deterministic(rule in rule_tree(), rec in record(), f in facts()) {
        prop_assert_eq!(evaluate(&rule, &rec, &f), evaluate(&rule, &rec, &f));
    }

    #[test]
    fn all_required_passes_only_when_everything_is_met(
        outcomes in prop::collection::vec(outcome(), 1..8),
    ) {
        let all_met = outcomes.iter().all(|o| *o == ItemOutcome::Met);
        let expected = if all_met { IndicatorStatus::Pass } else { IndicatorStatus::Fail };
        prop_assert_eq!(status_of(&outcomes, ValidationStrategy::AllItemsRequired), Some(expected));
    }

    #[test]
    fn any_required_passes_iff_one_met(
        outcomes in prop::collection::vec(outcome(), 1..8),
    ) {
        let any_met = outcomes.contains(&ItemOutcome::Met);
        let expected = if any_met { IndicatorStatus::Pass } else { IndicatorStatus::Fail };
        prop_assert_eq!(status_of(&outcomes, ValidationStrategy::AnyItemRequired), Some(expected));
        prop_assert_eq!(status_of(&outcomes, ValidationStrategy::SharedPlusOrLogic), Some(expected));
    }

    #[test]
    fn any_fail_fails_the_area(
        statuses in prop::collection::vec(
            prop_oneof![
                Just(None),
                Just(Some(IndicatorStatus::Pass)),
                Just(Some(IndicatorStatus::Conditional)),
                Just(Some(IndicatorStatus::Fail)),
            ],
            0..8,
        ),
    ) {
        let verdict = aggregate(statuses.iter().copied());
        let has_fail = statuses.contains(&Some(IndicatorStatus::Fail));
        let has_evidence = statuses.iter().any(Option::is_some);
        let passed = !has_fail && has_evidence;
        prop_assert_eq!(verdict == assay_eval::AreaResult::Passed, passed);
    }
}
