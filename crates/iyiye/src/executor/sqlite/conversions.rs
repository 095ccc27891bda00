//! SQLite value conversion functions.
//!
//! Pure functions for converting between JSON values and SQLite types.
//! These are testable in isolation without database access.

use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::ToSql;
use serde_json::Value;

/// Wrapper binding a JSON value as a SQLite parameter.
///
/// Booleans bind as 0/1 integers, compound values as their JSON text.
pub struct SqlParam<'a>(pub &'a Value);

impl ToSql for SqlParam<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self.0 {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    SqlValue::Real(f)
                } else {
                    SqlValue::Text(n.to_string())
                }
            }
            Value::String(s) => SqlValue::Text(s.clone()),
            other => SqlValue::Text(other.to_string()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

/// Convert a SQLite column value to JSON.
///
/// Real columns that do not fit a JSON number (NaN, infinity) become null;
/// blob columns come back as lowercase hex text.
pub fn column_value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(
            bytes
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<String>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bound(value: &Value) -> SqlValue {
        match SqlParam(value).to_sql().unwrap() {
            ToSqlOutput::Owned(v) => v,
            other => panic!("expected owned output, got {other:?}"),
        }
    }

    #[test]
    fn test_bind_scalar_values() {
        assert_eq!(bound(&json!(null)), SqlValue::Null);
        assert_eq!(bound(&json!(true)), SqlValue::Integer(1));
        assert_eq!(bound(&json!(42)), SqlValue::Integer(42));
        assert_eq!(bound(&json!(1.5)), SqlValue::Real(1.5));
        assert_eq!(bound(&json!("alice")), SqlValue::Text("alice".to_string()));
    }

    #[test]
    fn test_bind_compound_value_as_json_text() {
        assert_eq!(
            bound(&json!({"a": 1})),
            SqlValue::Text(r#"{"a":1}"#.to_string())
        );
    }

    #[test]
    fn test_column_value_round_trip() {
        assert_eq!(column_value_to_json(ValueRef::Null), json!(null));
        assert_eq!(column_value_to_json(ValueRef::Integer(7)), json!(7));
        assert_eq!(column_value_to_json(ValueRef::Real(2.5)), json!(2.5));
        assert_eq!(
            column_value_to_json(ValueRef::Text(b"shipped")),
            json!("shipped")
        );
    }

    #[test]
    fn test_blob_becomes_hex_text() {
        assert_eq!(
            column_value_to_json(ValueRef::Blob(&[0xde, 0xad])),
            json!("dead")
        );
    }
}
