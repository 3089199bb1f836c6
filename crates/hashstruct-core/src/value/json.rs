//! JSON projection of values and the reverse mapping used for declarative
//! defaults.

use crate::value::Value;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

impl Value {
    /// Project into a JSON-safe tree.
    ///
    /// Decimals, symbols, timestamps and dates become strings; non-finite
    /// floats become `null`; map keys are rendered as strings; nested
    /// records are projected through `Record::serialize`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Date(d) => JsonValue::String(d.to_string()),
            Self::Decimal(d) => JsonValue::String(d.to_string()),
            Self::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Self::Int(i) => JsonValue::Number((*i).into()),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => {
                let object: JsonMap<String, JsonValue> = entries
                    .iter()
                    .map(|(key, value)| (json_key(key), value.to_json()))
                    .collect();
                JsonValue::Object(object)
            }
            Self::Null => JsonValue::Null,
            Self::Record(record) => record.serialize(),
            Self::Symbol(s) => JsonValue::String(s.to_string()),
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::Timestamp(t) => JsonValue::String(t.to_iso8601()),
        }
    }

    /// Lift a JSON tree into plain values. Integers that fit `i64` stay
    /// integers; every other number becomes a float.
    #[must_use]
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(*b),
            JsonValue::Number(n) => n
                .as_i64()
                .map_or_else(|| n.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            JsonValue::String(s) => Self::Text(s.clone()),
            JsonValue::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            JsonValue::Object(object) => Self::Map(
                object
                    .iter()
                    .map(|(k, v)| (Self::Text(k.clone()), Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

fn json_key(key: &Value) -> String {
    match key {
        Value::Text(s) => s.clone(),
        other => other.to_plain_string(),
    }
}
