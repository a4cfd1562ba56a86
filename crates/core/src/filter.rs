//! Scalar values and equality filters over record metadata.
//!
//! Only scalar values participate in equality filters and secondary
//! indexes; arrays and objects are not comparable and are skipped by both.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// JSON scalar value used for filtering and as a secondary-index key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (stored as f64)
    Number(f64),
    /// String value
    String(String),
}

impl ScalarValue {
    /// Project a JSON value onto a scalar. Arrays and objects yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<ScalarValue> {
        match value {
            serde_json::Value::Null => Some(ScalarValue::Null),
            serde_json::Value::Bool(b) => Some(ScalarValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(ScalarValue::Number),
            serde_json::Value::String(s) => Some(ScalarValue::String(s.clone())),
            _ => None,
        }
    }

    /// Check if this scalar equals a JSON value.
    pub fn matches_json(&self, value: &serde_json::Value) -> bool {
        match (self, value) {
            (ScalarValue::Null, serde_json::Value::Null) => true,
            (ScalarValue::Bool(a), serde_json::Value::Bool(b)) => a == b,
            (ScalarValue::Number(a), serde_json::Value::Number(b)) => {
                b.as_f64().is_some_and(|n| (a - n).abs() < f64::EPSILON)
            }
            (ScalarValue::String(a), serde_json::Value::String(b)) => a == b,
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ScalarValue::Null => 0,
            ScalarValue::Bool(_) => 1,
            ScalarValue::Number(_) => 2,
            ScalarValue::String(_) => 3,
        }
    }
}

// Total order so scalars can key a BTreeMap. Numbers compare via total_cmp;
// mixed kinds order by rank.
impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScalarValue {}

impl PartialOrd for ScalarValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScalarValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ScalarValue::Null, ScalarValue::Null) => Ordering::Equal,
            (ScalarValue::Bool(a), ScalarValue::Bool(b)) => a.cmp(b),
            (ScalarValue::Number(a), ScalarValue::Number(b)) => a.total_cmp(b),
            (ScalarValue::String(a), ScalarValue::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Bool(v)
    }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        ScalarValue::Number(v as f64)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Number(v as f64)
    }
}

impl From<f32> for ScalarValue {
    fn from(v: f32) -> Self {
        ScalarValue::Number(v as f64)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Number(v)
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::String(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::String(v.to_string())
    }
}

/// Metadata filter for queries (equality only).
///
/// Supports only top-level field equality; all conditions must match
/// (AND semantics). Range and nested-path filters are out of scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataFilter {
    /// Top-level field equality (scalar values only)
    pub equals: HashMap<String, ScalarValue>,
}

impl MetadataFilter {
    /// Create an empty filter (matches all).
    pub fn new() -> Self {
        MetadataFilter {
            equals: HashMap::new(),
        }
    }

    /// Add an equality condition.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.equals.insert(field.into(), value.into());
        self
    }

    /// Check if a metadata mapping matches every condition.
    pub fn matches(&self, metadata: &serde_json::Map<String, serde_json::Value>) -> bool {
        for (key, expected) in &self.equals {
            let Some(actual) = metadata.get(key) else {
                return false;
            };
            if !expected.matches_json(actual) {
                return false;
            }
        }
        true
    }

    /// Check if the filter is empty (matches all).
    pub fn is_empty(&self) -> bool {
        self.equals.is_empty()
    }

    /// Number of conditions in the filter.
    pub fn len(&self) -> usize {
        self.equals.len()
    }
}
