//! Typed cell values and the text-to-value cast rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use primdb_common::{DbError, DbResult};

use crate::schema::ColumnType;

/// A typed cell value.
///
/// Serializes to the matching JSON scalar: `int` → number, `bool` → boolean,
/// `str` → string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    Str(String),
}

impl Value {
    /// Creates a string value.
    pub fn string(v: impl Into<String>) -> Self {
        Value::Str(v.into())
    }

    /// Returns the column type this value belongs to.
    pub fn data_type(&self) -> ColumnType {
        match self {
            Value::Bool(_) => ColumnType::Bool,
            Value::Int(_) => ColumnType::Int,
            Value::Str(_) => ColumnType::Str,
        }
    }

    /// Returns the integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Casts raw command text to a value of `data_type`.
    ///
    /// - `int`: base-10 integer.
    /// - `bool`: `true` or `false`, any case.
    /// - `str`: text wrapped in one matching pair of `"` or `'`; the pair is
    ///   stripped.
    ///
    /// Anything else fails with `InvalidValue`.
    pub fn cast(raw: &str, data_type: ColumnType) -> DbResult<Self> {
        match data_type {
            ColumnType::Int => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| DbError::invalid_value(raw)),
            ColumnType::Bool => {
                if raw.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(DbError::invalid_value(raw))
                }
            }
            ColumnType::Str => unquote(raw)
                .map(Value::string)
                .ok_or_else(|| DbError::invalid_value(raw)),
        }
    }
}

/// Strips one matching pair of outer quotes.
fn unquote(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    if bytes.len() < 2 {
        return None;
    }

    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    if first != last || !matches!(first, b'"' | b'\'') {
        return None;
    }

    // Both ends are single-byte ASCII quotes, so these are char boundaries.
    Some(&raw[1..raw.len() - 1])
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primdb_common::ErrorKind;

    #[test]
    fn test_cast_int() {
        assert_eq!(Value::cast("30", ColumnType::Int).unwrap(), Value::Int(30));
        assert_eq!(Value::cast("-7", ColumnType::Int).unwrap(), Value::Int(-7));

        for raw in ["3.5", "abc", "", "\"30\"", "1e3"] {
            let err = Value::cast(raw, ColumnType::Int).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidValue, "{raw}");
        }
    }

    #[test]
    fn test_cast_bool() {
        assert_eq!(Value::cast("true", ColumnType::Bool).unwrap(), Value::Bool(true));
        assert_eq!(Value::cast("FALSE", ColumnType::Bool).unwrap(), Value::Bool(false));
        assert_eq!(Value::cast("True", ColumnType::Bool).unwrap(), Value::Bool(true));

        for raw in ["yes", "1", "0", "t", "\"true\""] {
            assert!(Value::cast(raw, ColumnType::Bool).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_cast_str_strips_quotes() {
        assert_eq!(Value::cast("\"abc\"", ColumnType::Str).unwrap(), Value::string("abc"));
        assert_eq!(Value::cast("'abc'", ColumnType::Str).unwrap(), Value::string("abc"));
        assert_eq!(Value::cast("\"\"", ColumnType::Str).unwrap(), Value::string(""));
        assert_eq!(
            Value::cast("'Привет, мир'", ColumnType::Str).unwrap(),
            Value::string("Привет, мир")
        );
    }

    #[test]
    fn test_cast_str_rejects_unquoted() {
        for raw in ["abc", "\"abc'", "'abc\"", "\"", "'", "abc\""] {
            let err = Value::cast(raw, ColumnType::Str).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidValue, "{raw}");
        }
    }

    #[test]
    fn test_cast_then_render_preserves_content() {
        let value = Value::cast("\"abc\"", ColumnType::Str).unwrap();
        assert_eq!(value.to_string(), "abc");
    }

    #[test]
    fn test_no_cross_type_equality() {
        assert_ne!(Value::Int(1), Value::Bool(true));
        assert_ne!(Value::Int(1), Value::string("1"));
        assert_eq!(Value::Int(1).data_type(), ColumnType::Int);
    }

    #[test]
    fn test_json_scalars() {
        let values = vec![Value::Int(1), Value::Bool(false), Value::string("x")];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1,false,"x"]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
