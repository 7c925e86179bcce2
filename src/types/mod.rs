//! Value and record types for the query engine

mod record;

pub use record::Record;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single field value.
///
/// There is no schema: values are whatever the statement text or the row
/// file carried. Comparisons coerce at evaluation time, so `Number(30.0)`
/// and `Text("30")` behave the same under `=` and the range operators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// Absent or explicit null
    Null,

    /// Numeric value
    Number(f64),

    /// Text string
    Text(String),
}

impl Value {
    /// Numeric view of the value. Non-numeric text and null yield NaN,
    /// which makes every range comparison false.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            Value::Null => f64::NAN,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral numbers render without a fractional part so that a
            // stored 42 stringifies as "42" for IN and LIKE comparisons
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Null => Ok(()),
        }
    }
}

impl PartialOrd for Value {
    /// Sort-key ordering: numeric when both sides parse as finite numbers,
    /// lexicographic on the stringified values otherwise.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (a, b) = (self.to_number(), other.to_number());
        if a.is_finite() && b.is_finite() {
            a.partial_cmp(&b)
        } else {
            Some(self.to_string().cmp(&other.to_string()))
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

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_integral_number() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Text("Smith".into()).to_string(), "Smith");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::Text("30".into()).to_number(), 30.0);
        assert!(Value::Text("Berlin".into()).to_number().is_nan());
        assert!(Value::Null.to_number().is_nan());
    }

    #[test]
    fn test_ordering_numeric_before_lexicographic() {
        let a = Value::Text("100".into());
        let b = Value::Text("20".into());
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Greater));

        let a = Value::Text("Alice".into());
        let b = Value::Text("Bob".into());
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Less));
    }

    #[test]
    fn test_serde_round_trip() {
        let json = r#"[null, 7, "seven"]"#;
        let values: Vec<Value> = serde_json::from_str(json).unwrap();
        assert_eq!(
            values,
            vec![Value::Null, Value::Number(7.0), Value::Text("seven".into())]
        );
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[null,7.0,"seven"]"#);
    }
}
