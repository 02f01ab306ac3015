//! Response values as collected by the form layer.
//!
//! A response record maps field ids to values. Values are either a single
//! scalar or a flat list of scalars (multi-select answers, uploaded file
//! names). Conversion from JSON never fails: shapes the engine does not
//! understand are kept as [`FieldValue::Structured`] and every rule treats
//! them as "does not hold".

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Scalars
// ──────────────────────────────────────────────

/// A single answer value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Bool(bool),
    Number(Decimal),
    Text(String),
}

impl Scalar {
    /// Convert a JSON leaf into a scalar. Returns `None` for null, arrays
    /// and objects.
    pub fn from_json(value: &serde_json::Value) -> Option<Scalar> {
        match value {
            serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => Some(match number_to_decimal(n) {
                Some(d) => Scalar::Number(d),
                None => Scalar::Text(n.to_string()),
            }),
            serde_json::Value::String(s) => Some(Scalar::Text(s.clone())),
            _ => None,
        }
    }

    /// Numeric view of this scalar. Text is accepted when it parses as a
    /// decimal, since form layers often submit numbers as strings.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Scalar::Number(d) => Some(*d),
            Scalar::Text(s) => parse_decimal(s.trim()),
            Scalar::Bool(_) => None,
        }
    }

    /// Exact-match comparison. Numbers compare by value (`1` equals `1.0`);
    /// everything else compares by kind and content.
    pub fn matches(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Number(l), Scalar::Number(r)) => l == r,
            (Scalar::Text(l), Scalar::Text(r)) => l == r,
            (Scalar::Bool(l), Scalar::Bool(r)) => l == r,
            _ => false,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Number(d) => decimal_to_json(*d),
            Scalar::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

// ──────────────────────────────────────────────
// Field values
// ──────────────────────────────────────────────

/// The value stored for one field of a response record.
///
/// Absence is represented by the field not being present in the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    /// Objects or nested lists. Not supported by any rule kind.
    Structured(serde_json::Value),
}

impl FieldValue {
    /// Convert a JSON value. Returns `None` for JSON `null` (absent).
    pub fn from_json(value: &serde_json::Value) -> Option<FieldValue> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Array(items) => {
                let mut scalars = Vec::with_capacity(items.len());
                for item in items {
                    match Scalar::from_json(item) {
                        Some(s) => scalars.push(s),
                        None => return Some(FieldValue::Structured(value.clone())),
                    }
                }
                Some(FieldValue::List(scalars))
            }
            serde_json::Value::Object(_) => Some(FieldValue::Structured(value.clone())),
            leaf => Scalar::from_json(leaf).map(FieldValue::Scalar),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Scalar(s) => s.to_json(),
            FieldValue::List(items) => {
                serde_json::Value::Array(items.iter().map(Scalar::to_json).collect())
            }
            FieldValue::Structured(v) => v.clone(),
        }
    }

    /// Human-readable kind for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Scalar(Scalar::Bool(_)) => "bool",
            FieldValue::Scalar(Scalar::Number(_)) => "number",
            FieldValue::Scalar(Scalar::Text(_)) => "text",
            FieldValue::List(_) => "list",
            FieldValue::Structured(_) => "structured",
        }
    }
}

// ──────────────────────────────────────────────
// Response record
// ──────────────────────────────────────────────

/// A submitted answer set for one indicator, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, serde_json::Value>",
    into = "BTreeMap<String, serde_json::Value>"
)]
pub struct ResponseRecord(BTreeMap<String, FieldValue>);

impl ResponseRecord {
    pub fn new() -> Self {
        ResponseRecord(BTreeMap::new())
    }

    pub fn get(&self, field_id: &str) -> Option<&FieldValue> {
        self.0.get(field_id)
    }

    pub fn insert(&mut self, field_id: impl Into<String>, value: FieldValue) {
        self.0.insert(field_id.into(), value);
    }

    /// Insert from JSON; a `null` removes the field.
    pub fn insert_json(&mut self, field_id: impl Into<String>, value: &serde_json::Value) {
        let field_id = field_id.into();
        match FieldValue::from_json(value) {
            Some(v) => {
                self.0.insert(field_id, v);
            }
            None => {
                self.0.remove(&field_id);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Canonical JSON form (keys sorted).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, serde_json::Value>> for ResponseRecord {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let mut record = ResponseRecord::new();
        for (k, v) in &raw {
            record.insert_json(k.clone(), v);
        }
        record
    }
}

impl From<ResponseRecord> for BTreeMap<String, serde_json::Value> {
    fn from(record: ResponseRecord) -> Self {
        record.0.into_iter().map(|(k, v)| (k, v.to_json())).collect()
    }
}

// ──────────────────────────────────────────────
// Decimal helpers
// ──────────────────────────────────────────────

fn number_to_decimal(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    parse_decimal(&n.to_string())
}

/// Parse plain or scientific decimal notation.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn decimal_to_json(d: Decimal) -> serde_json::Value {
    let normalized = d.normalize();
    if normalized.scale() == 0 {
        if let Ok(i) = i64::try_from(normalized.mantissa()) {
            return serde_json::Value::from(i);
        }
    }
    serde_json::Number::from_str(&normalized.to_string())
        .map(serde_json::Value::Number)
        .unwrap_or_else(|_| serde_json::Value::String(normalized.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_from_json_object() {
        let record: ResponseRecord = serde_json::from_value(json!({
            "completion_rate": 85,
            "required_documents": ["a", "b"],
            "remarks": "ok",
            "skipped": null,
        }))
        .unwrap();

        assert_eq!(record.len(), 3);
        assert_eq!(
            record.get("completion_rate"),
            Some(&FieldValue::Scalar(Scalar::Number(Decimal::from(85))))
        );
        assert!(matches!(record.get("required_documents"), Some(FieldValue::List(items)) if items.len() == 2));
        assert!(record.get("skipped").is_none());
    }

    #[test]
    fn nested_list_is_structured() {
        let v = FieldValue::from_json(&json!([["a"], "b"])).unwrap();
        assert_eq!(v.kind_name(), "structured");
        let v = FieldValue::from_json(&json!({"a": 1})).unwrap();
        assert_eq!(v.kind_name(), "structured");
    }

    #[test]
    fn numeric_text_reads_as_decimal() {
        assert_eq!(
            Scalar::Text(" 72.5 ".into()).as_decimal(),
            Some(Decimal::new(725, 1))
        );
        assert_eq!(Scalar::Text("n/a".into()).as_decimal(), None);
        assert_eq!(Scalar::Bool(true).as_decimal(), None);
    }

    #[test]
    fn fractional_numbers_keep_precision() {
        let v = Scalar::from_json(&json!(74.99)).unwrap();
        assert_eq!(v, Scalar::Number(Decimal::new(7499, 2)));
    }

    #[test]
    fn numbers_match_by_value() {
        let a = Scalar::Number(Decimal::new(10, 1));
        let b = Scalar::Number(Decimal::from(1));
        assert!(a.matches(&b));
        assert!(!Scalar::Text("1".into()).matches(&b));
    }

    #[test]
    fn record_serializes_back_to_json() {
        let src = json!({"a": 1, "b": ["x", true], "c": 2.5});
        let record: ResponseRecord = serde_json::from_value(src.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), src);
    }
}
