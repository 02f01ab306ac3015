//! Numeric reads and comparisons using `rust_decimal`.
//!
//! No `f64` anywhere in the evaluation path. Reads are total: a value
//! that is not numeric (or not a list, for counts) yields `None` and the
//! caller fails the rule closed.

use rust_decimal::Decimal;

use assay_core::{ComparisonOperator, FieldValue, Scalar};

/// Compare `l op r`.
pub fn compare_decimals(l: Decimal, r: Decimal, op: ComparisonOperator) -> bool {
    match op {
        ComparisonOperator::Eq => l == r,
        ComparisonOperator::Ne => l != r,
        ComparisonOperator::Lt => l < r,
        ComparisonOperator::Lte => l <= r,
        ComparisonOperator::Gt => l > r,
        ComparisonOperator::Gte => l >= r,
    }
}

/// Numeric view of a field value: a number, or text that parses as one.
/// Lists, booleans and structured values are not numeric.
pub fn read_number(value: &FieldValue) -> Option<Decimal> {
    match value {
        FieldValue::Scalar(s) => s.as_decimal(),
        FieldValue::List(_) | FieldValue::Structured(_) => None,
    }
}

/// Element count of a list value. `None` when the value is not a list.
pub fn read_count(value: &FieldValue) -> Option<Decimal> {
    match value {
        FieldValue::List(items) => Some(Decimal::from(items.len())),
        FieldValue::Scalar(_) | FieldValue::Structured(_) => None,
    }
}

/// Convert an authored expected value into a scalar for matching.
pub fn expected_scalar(expected: &serde_json::Value) -> Option<Scalar> {
    Scalar::from_json(expected)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn all_operators() {
        let (l, r) = (dec("75"), dec("75.0"));
        assert!(compare_decimals(l, r, ComparisonOperator::Eq));
        assert!(!compare_decimals(l, r, ComparisonOperator::Ne));
        assert!(compare_decimals(l, r, ComparisonOperator::Gte));
        assert!(compare_decimals(l, r, ComparisonOperator::Lte));
        assert!(!compare_decimals(l, r, ComparisonOperator::Gt));
        assert!(!compare_decimals(l, r, ComparisonOperator::Lt));
        assert!(compare_decimals(dec("74.99"), r, ComparisonOperator::Lt));
    }

    #[test]
    fn reads_are_total() {
        let n = FieldValue::Scalar(Scalar::Number(dec("85")));
        let t = FieldValue::Scalar(Scalar::Text("85.5".into()));
        let b = FieldValue::Scalar(Scalar::Bool(true));
        let l = FieldValue::List(vec![Scalar::Text("a".into()), Scalar::Text("b".into())]);

        assert_eq!(read_number(&n), Some(dec("85")));
        assert_eq!(read_number(&t), Some(dec("85.5")));
        assert_eq!(read_number(&b), None);
        assert_eq!(read_number(&l), None);

        assert_eq!(read_count(&l), Some(dec("2")));
        assert_eq!(read_count(&n), None);
    }
}
