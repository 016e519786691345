//! Scalar values bound to statements and read back from rows.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A scalar value that can be bound as a statement argument or read from a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// Raw bytes that are not valid UTF-8.
    Bytes(Vec<u8>),
}

impl Value {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the integer value, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => write!(f, "'{}'", s),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// Error converting a [`Value`] into a typed field.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot convert {found} value into {expected}")]
pub struct ValueError {
    /// The Rust type that was requested.
    pub expected: &'static str,
    /// The variant that was found.
    pub found: &'static str,
}

impl ValueError {
    fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.type_name(),
        }
    }
}

/// A typed model field that can report its current value.
///
/// `None` means the field is unset, which only `Option<T>` fields can be.
pub trait FieldValue {
    /// Current value of the field, or `None` if unset.
    fn to_field_value(&self) -> Option<Value>;
}

/// A typed model field that can be rebuilt from a [`Value`].
pub trait FromValue: Sized {
    /// Convert from a value.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

macro_rules! impl_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_field_value(&self) -> Option<Value> {
                    Some(Value::from(self.clone()))
                }
            }
        )*
    };
}

impl_field_value!(bool, i32, u32, i64, f32, f64, String, Vec<u8>);

impl FieldValue for Value {
    fn to_field_value(&self) -> Option<Value> {
        Some(self.clone())
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_field_value(&self) -> Option<Value> {
        self.as_ref().and_then(FieldValue::to_field_value)
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            // MySQL `boolean` is `tinyint(1)` on the wire
            Value::Int(i) => Ok(i != 0),
            other => Err(ValueError::new("bool", &other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Bool(b) => Ok(i64::from(b)),
            other => Err(ValueError::new("i64", &other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(i) => i32::try_from(i).map_err(|_| ValueError::new("i32", &Value::Int(i))),
            Value::Bool(b) => Ok(i32::from(b)),
            other => Err(ValueError::new("i32", &other)),
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(i) => u32::try_from(i).map_err(|_| ValueError::new("u32", &Value::Int(i))),
            other => Err(ValueError::new("u32", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            // DECIMAL columns arrive as text
            Value::String(s) => s
                .parse()
                .map_err(|_| ValueError::new("f64", &Value::String(s))),
            other => Err(ValueError::new("f64", &other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s),
            Value::Bytes(b) => {
                String::from_utf8(b).map_err(|e| ValueError::new("String", &Value::Bytes(e.into_bytes())))
            }
            other => Err(ValueError::new("String", &other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bytes(b) => Ok(b),
            Value::String(s) => Ok(s.into_bytes()),
            other => Err(ValueError::new("Vec<u8>", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_primitives() {
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("a"), Value::String("a".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(1.5)), Value::Float(1.5));
    }

    #[test]
    fn test_field_value_option_unset() {
        let unset: Option<String> = None;
        assert_eq!(unset.to_field_value(), None);
        assert_eq!(
            Some("x".to_string()).to_field_value(),
            Some(Value::String("x".to_string()))
        );
        assert_eq!(7i64.to_field_value(), Some(Value::Int(7)));
    }

    #[test]
    fn test_from_value_coercions() {
        assert!(bool::from_value(Value::Int(1)).unwrap());
        assert_eq!(f64::from_value(Value::Int(3)).unwrap(), 3.0);
        assert_eq!(f64::from_value(Value::String("2.50".into())).unwrap(), 2.5);
        assert_eq!(
            String::from_value(Value::Bytes(b"hi".to_vec())).unwrap(),
            "hi"
        );
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
    }

    #[test]
    fn test_from_value_mismatch() {
        let err = i64::from_value(Value::String("x".into())).unwrap_err();
        assert_eq!(err.expected, "i64");
        assert_eq!(err.found, "string");
        assert!(i32::from_value(Value::Int(i64::MAX)).is_err());
    }

    #[test]
    fn test_value_serde_untagged() {
        let json = serde_json::to_string(&vec![Value::Int(1), Value::Null, Value::from("a")]).unwrap();
        assert_eq!(json, r#"[1,null,"a"]"#);
    }
}
