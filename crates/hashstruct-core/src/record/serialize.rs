use crate::{record::Record, value::Value};
use serde_json::{Map as JsonMap, Value as JsonValue};

impl Record {
    /// JSON-safe tree over every declared property (aliases included as
    /// duplicate keys). Nested records serialize themselves.
    #[must_use]
    pub fn serialize(&self) -> JsonValue {
        let object: JsonMap<String, JsonValue> = self
            .full_attributes()
            .into_iter()
            .map(|(name, value)| (name, value.to_json()))
            .collect();

        JsonValue::Object(object)
    }

    #[must_use]
    pub fn as_json(&self) -> JsonValue {
        self.serialize()
    }

    /// Native tree over the same view as `serialize`, with nested records
    /// flattened into plain maps.
    #[must_use]
    pub fn to_plain_value(&self) -> Value {
        Value::Map(
            self.full_attributes()
                .into_iter()
                .map(|(name, value)| (Value::Text(name), plain(value)))
                .collect(),
        )
    }
}

fn plain(value: Value) -> Value {
    match value {
        Value::Record(record) => record.to_plain_value(),
        Value::List(items) => Value::List(items.into_iter().map(plain).collect()),
        Value::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| (plain(key), plain(value)))
                .collect(),
        ),
        other => other,
    }
}
