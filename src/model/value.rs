//! Cell values as returned by a data source.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::numeric::leading_number;

/// A single value in a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric reading of this value.
    ///
    /// Text is read by its leading numeric prefix, so `"11-doc"` is `11.0`.
    /// Null and text without a numeric prefix read as zero.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Integer(i) => *i as f64,
            Value::Real(f) => *f,
            Value::Text(s) => leading_number(s),
        }
    }

    /// Text form used for comparisons against condition operands.
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// Ordering used by in-memory sorting.
    ///
    /// Nulls sort first. Numbers compare numerically with each other;
    /// anything else compares by its text form.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Integer(_) | Value::Real(_), Value::Integer(_) | Value::Real(_)) => self
                .as_number()
                .partial_cmp(&other.as_number())
                .unwrap_or(Ordering::Equal),
            _ => self.as_text().cmp(&other.as_text()),
        }
    }
}

/// Format a float the way reports display it: integral values as plain
/// digits without a fractional part or exponent, everything else through ryu.
pub fn format_number(f: f64) -> String {
    if !f.is_finite() {
        String::new()
    } else if f.fract() == 0.0 {
        if (i64::MIN as f64..i64::MAX as f64).contains(&f) {
            (f as i64).to_string()
        } else {
            format!("{:.0}", f)
        }
    } else {
        let mut buffer = ryu::Buffer::new();
        buffer.format(f).to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", format_number(*r)),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
