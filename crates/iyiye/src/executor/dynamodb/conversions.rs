//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting DynamoDB AttributeValue maps to JSON rows.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::DateTime;
use serde_json::Value;

use iyiye_core::statement::Row;

/// Convert a DynamoDB item to a JSON row.
///
/// Epoch-second numeric attributes whose name marks them as temporal
/// (`*_time` / `*Time`) come back as ISO-8601 UTC strings with a `Z`
/// suffix, matching the relational side of the API.
pub fn item_to_row(item: &HashMap<String, AttributeValue>) -> Row {
    let mut row = Row::new();
    for (name, attribute) in item {
        let value = attribute_value_to_json(attribute);
        row.insert(name.clone(), normalize_temporal(name, value));
    }
    row
}

/// Convert a single AttributeValue to JSON.
///
/// Binary values come back as lowercase hex text; unrecognized attribute
/// kinds map to null.
pub fn attribute_value_to_json(attribute: &AttributeValue) -> Value {
    match attribute {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => {
            Value::Array(list.iter().map(attribute_value_to_json).collect())
        }
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), attribute_value_to_json(v)))
                .collect(),
        ),
        AttributeValue::Ss(set) => {
            Value::Array(set.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(set) => Value::Array(set.iter().map(|n| number_to_json(n)).collect()),
        AttributeValue::B(blob) => Value::String(
            blob.as_ref()
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<String>(),
        ),
        _ => Value::Null,
    }
}

fn number_to_json(n: &str) -> Value {
    if let Ok(i) = n.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = n.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(f) {
            return Value::Number(number);
        }
    }
    Value::String(n.to_string())
}

fn is_temporal_attribute(name: &str) -> bool {
    name.ends_with("_time") || name.ends_with("Time")
}

fn normalize_temporal(name: &str, value: Value) -> Value {
    if !is_temporal_attribute(name) {
        return value;
    }
    match value.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)) {
        Some(timestamp) => Value::String(timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        None => value,
    }
}
