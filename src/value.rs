//! Dynamically typed attribute values
//!
//! Every attribute a [`Model`](crate::Model) stores is a [`Value`]. Values know their
//! string form (used by the presence, format and length rules), how to order themselves
//! against another value (used by the range rule) and how to snapshot themselves as JSON.
//!
//! # Examples
//!
//! ```
//! use tidewater::Value;
//! use std::cmp::Ordering;
//!
//! assert_eq!(Value::from(5).to_string(), "5");
//! assert_eq!(Value::Null.to_string(), "");
//!
//! // Form input arrives as text, but still orders against numbers
//! assert_eq!(Value::from("4").compare(&Value::from(5)), Some(Ordering::Less));
//! assert!(Value::from("1").loosely_eq(&Value::from(1)));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Capability to produce a JSON snapshot of a value.
///
/// Implemented by [`Model`](crate::Model) so that a model stored inside another model's
/// attributes serializes as its own snapshot.
pub trait ToJson: fmt::Debug + Send + Sync {
    /// Produce a JSON snapshot.
    fn to_json(&self) -> serde_json::Value;
}

impl ToJson for serde_json::Value {
    fn to_json(&self) -> serde_json::Value {
        self.clone()
    }
}

/// A named attribute's value.
///
/// An attribute that was never set is *absent* (`None` from
/// [`Model::get`](crate::Model::get)), which is different from [`Value::Null`].
#[derive(Debug, Clone)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
    /// Point in time, compared chronologically
    DateTime(DateTime<Utc>),
    /// Ordered list of values
    List(Vec<Value>),
    /// A value with its own JSON snapshot, usually another model
    Nested(Arc<dyn ToJson>),
}

impl Value {
    /// Wrap anything with a JSON snapshot as a nested value.
    ///
    /// ```
    /// use tidewater::Value;
    ///
    /// let nested = Value::nested(serde_json::json!({ "sku": "A-1" }));
    /// assert_eq!(nested.to_json(), serde_json::json!({ "sku": "A-1" }));
    /// ```
    pub fn nested<T: ToJson + 'static>(value: T) -> Self {
        Value::Nested(Arc::new(value))
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text of a [`Value::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value.
    ///
    /// Integers and floats convert directly; text converts when it parses as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Order two values.
    ///
    /// Text orders lexically against text, date-times chronologically against date-times,
    /// and anything with a numeric view numerically. Every other pairing is incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => {
                let a = self.as_f64()?;
                let b = other.as_f64()?;
                a.partial_cmp(&b)
            }
        }
    }

    /// Equality that treats numbers and numeric text alike.
    ///
    /// ```
    /// use tidewater::Value;
    ///
    /// assert!(Value::from(2).loosely_eq(&Value::from(2.0)));
    /// assert!(Value::from("2").loosely_eq(&Value::from(2)));
    /// assert!(!Value::from("2").loosely_eq(&Value::from("2.0")));
    /// ```
    pub fn loosely_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (
                Value::Int(_) | Value::Float(_) | Value::Text(_),
                Value::Int(_) | Value::Float(_) | Value::Text(_),
            ) => matches!((self.as_f64(), other.as_f64()), (Some(a), Some(b)) if a == b),
            _ => self == other,
        }
    }

    /// JSON snapshot of the value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(dt) => {
                serde_json::Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::List(items) => items.iter().map(Value::to_json).collect(),
            Value::Nested(inner) => inner.to_json(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Nested(a), Value::Nested(b)) => a.to_json() == b.to_json(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => {
                f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Nested(inner) => write!(f, "{}", inner.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            object @ serde_json::Value::Object(_) => Value::nested(object),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_string_form() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(
            Value::from(vec![Value::from(1), Value::from("b")]).to_string(),
            "1,b"
        );
    }

    #[test]
    fn test_date_time_string_form() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(Value::from(dt).to_string(), "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_compare_numbers_across_kinds() {
        assert_eq!(Value::from(4).compare(&Value::from(4.5)), Some(Ordering::Less));
        assert_eq!(Value::from("11").compare(&Value::from(10)), Some(Ordering::Greater));
        assert_eq!(Value::from(5).compare(&Value::from(5)), Some(Ordering::Equal));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let max = Value::from(1_i64 << 53);
        let above = Value::from((1_i64 << 53) + 1);

        assert_eq!(above.compare(&max), Some(Ordering::Greater));
        assert_eq!(max.compare(&above), Some(Ordering::Less));
        assert!(!above.loosely_eq(&max));
        assert!(above.loosely_eq(&Value::from((1_i64 << 53) + 1)));
        assert_eq!(Value::from(i64::MAX).compare(&Value::from(i64::MAX - 1)), Some(Ordering::Greater));
    }

    #[test]
    fn test_compare_text_is_lexical() {
        assert_eq!(Value::from("10").compare(&Value::from("9")), Some(Ordering::Less));
        assert_eq!(Value::from("b").compare(&Value::from("a")), Some(Ordering::Greater));
    }

    #[test]
    fn test_compare_dates() {
        let early = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            Value::from(early).compare(&Value::from(late)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_incomparable_pairs() {
        assert_eq!(Value::from("abc").compare(&Value::from(5)), None);
        assert_eq!(Value::from(true).compare(&Value::from(1)), None);
        assert_eq!(Value::Null.compare(&Value::from(1)), None);
    }

    #[test]
    fn test_loosely_eq() {
        assert!(Value::from("1").loosely_eq(&Value::from("1")));
        assert!(Value::from("1").loosely_eq(&Value::from(1)));
        assert!(!Value::from("yes").loosely_eq(&Value::from(1)));
        assert!(!Value::Null.loosely_eq(&Value::from("1")));
        assert!(Value::from(true).loosely_eq(&Value::from(true)));
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Value::Null.to_json(), json!(null));
        assert_eq!(Value::from(3).to_json(), json!(3));
        assert_eq!(Value::from(f64::NAN).to_json(), json!(null));
        assert_eq!(
            Value::from(vec![Value::from("a"), Value::Null]).to_json(),
            json!(["a", null])
        );
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(json!(7)), Value::Int(7));
        assert_eq!(Value::from(json!(0.5)), Value::Float(0.5));
        assert_eq!(Value::from(json!("x")), Value::Text("x".into()));
        assert_eq!(
            Value::from(json!([1, null])),
            Value::List(vec![Value::Int(1), Value::Null])
        );
        let object = Value::from(json!({ "a": 1 }));
        assert_eq!(object.to_json(), json!({ "a": 1 }));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
