//! Dynamic attribute values
//!
//! This module defines [`Value`], the closed sum type stored in attribute
//! values and metadata entries:
//! - null, boolean, number, string, array, object (the JSON data model)
//! - type inference for synthesized attributes ([`Value::inferred_type`])
//! - a total ordering used when sorting query results ([`Value::sort_cmp`])

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Type tag inferred for string values.
pub const TYPE_TEXT: &str = "Text";
/// Type tag inferred for numeric values.
pub const TYPE_NUMBER: &str = "Number";
/// Type tag inferred for boolean values.
pub const TYPE_BOOLEAN: &str = "Boolean";
/// Type tag inferred for null.
pub const TYPE_NONE: &str = "None";
/// Type tag inferred for arrays and objects.
pub const TYPE_STRUCTURED: &str = "StructuredValue";

/// Dynamically typed attribute value
///
/// Newtype around `serde_json::Value` providing:
/// - Read access to the underlying value via `Deref`
/// - Easy construction from common types
/// - Transparent serialization
///
/// # Examples
///
/// ```
/// use attrstore_core::Value;
///
/// let t = Value::from(21.5);
/// assert_eq!(t.inferred_type(), "Number");
///
/// let s = Value::from("ON");
/// assert_eq!(s.inferred_type(), "Text");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(serde_json::Value);

impl Value {
    /// Create a null value
    pub fn null() -> Self {
        Value(serde_json::Value::Null)
    }

    /// Create an empty object value
    pub fn object() -> Self {
        Value(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Create an empty array value
    pub fn array() -> Self {
        Value(serde_json::Value::Array(Vec::new()))
    }

    /// Create from a serde_json::Value
    pub fn from_value(value: serde_json::Value) -> Self {
        Value(value)
    }

    /// Get the underlying serde_json::Value
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the underlying serde_json::Value
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }

    /// Parse JSON text
    pub fn from_json_str(s: &str) -> crate::error::Result<Self> {
        Ok(s.parse()?)
    }

    /// Serialize to compact JSON string
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    /// Type tag for an attribute synthesized from this value.
    ///
    /// | Value          | Type tag            |
    /// |----------------|---------------------|
    /// | string         | `"Text"`            |
    /// | number         | `"Number"`          |
    /// | boolean        | `"Boolean"`         |
    /// | null           | `"None"`            |
    /// | array / object | `"StructuredValue"` |
    pub fn inferred_type(&self) -> &'static str {
        match &self.0 {
            serde_json::Value::String(_) => TYPE_TEXT,
            serde_json::Value::Number(_) => TYPE_NUMBER,
            serde_json::Value::Bool(_) => TYPE_BOOLEAN,
            serde_json::Value::Null => TYPE_NONE,
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => TYPE_STRUCTURED,
        }
    }

    /// Total ordering across all value shapes, used for sorting.
    ///
    /// Values of different shapes order by rank:
    /// null < number < string < object < array < boolean.
    /// Numbers compare numerically regardless of integer/float encoding;
    /// two integers compare exactly, even beyond 2^53.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        cmp_json(&self.0, &other.0)
    }
}

fn type_rank(v: &serde_json::Value) -> u8 {
    match v {
        serde_json::Value::Null => 0,
        serde_json::Value::Number(_) => 1,
        serde_json::Value::String(_) => 2,
        serde_json::Value::Object(_) => 3,
        serde_json::Value::Array(_) => 4,
        serde_json::Value::Bool(_) => 5,
    }
}

fn cmp_json(a: &serde_json::Value, b: &serde_json::Value) -> Ordering {
    use serde_json::Value as J;

    match (a, b) {
        (J::Null, J::Null) => Ordering::Equal,
        (J::Number(x), J::Number(y)) => cmp_numbers(x, y),
        (J::String(x), J::String(y)) => x.cmp(y),
        (J::Bool(x), J::Bool(y)) => x.cmp(y),
        (J::Array(x), J::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = cmp_json(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (J::Object(x), J::Object(y)) => {
            // serde_json maps iterate in key order
            for ((lk, lv), (rk, rv)) in x.iter().zip(y.iter()) {
                let ord = lk.cmp(rk).then_with(|| cmp_json(lv, rv));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

// Integers compare exactly; f64 only when a float is involved.
fn cmp_numbers(x: &serde_json::Number, y: &serde_json::Number) -> Ordering {
    match (integer(x), integer(y)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => {
            let a = x.as_f64().unwrap_or(f64::NAN);
            let b = y.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        }
    }
}

fn integer(n: &serde_json::Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

impl FromStr for Value {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(Value)
    }
}

impl Deref for Value {
    type Target = serde_json::Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Default is null
impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value(v)
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        v.0
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value(serde_json::Value::Bool(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value(serde_json::Value::Number(v.into()))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value(serde_json::Value::Number(v.into()))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value(serde_json::Value::Number(v.into()))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value(
            serde_json::Number::from_f64(v)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
        )
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value(serde_json::Value::String(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value(serde_json::Value::String(v))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value(serde_json::Value::Array(
            v.into_iter().map(|x| x.into().0).collect(),
        ))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::null(),
        }
    }
}
