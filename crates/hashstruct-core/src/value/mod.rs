mod json;
mod render;


pub(crate) use render::Inspect;

use crate::{
    record::Record,
    types::{Date, Decimal, Symbol, Timestamp},
};

///
/// Value
///
/// Dynamic value exchanged between callers, coercers and records.
///
/// Null   → absent / nil. Boolean coercion is the only coercer that runs on it.
/// Map    → insertion-ordered entries with unique keys; equality ignores order.
/// Record → a nested struct instance.
///

#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Date(Date),
    Decimal(Decimal),
    Float(f64),
    Int(i64),
    List(Vec<Self>),
    Map(Vec<(Self, Self)>),
    Null,
    Record(Box<Record>),
    Symbol(Symbol),
    Text(String),
    Timestamp(Timestamp),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn list<T>(items: impl IntoIterator<Item = T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Value::Map`; a repeated key keeps its first position and
    /// its last value.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Self>,
        V: Into<Self>,
    {
        Self::from_entries(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Normalize raw entries into a `Value::Map` with unique keys.
    #[must_use]
    pub fn from_entries(entries: Vec<(Self, Self)>) -> Self {
        let mut normalized: Vec<(Self, Self)> = Vec::with_capacity(entries.len());

        for (key, value) in entries {
            match normalized.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => normalized.push((key, value)),
            }
        }

        Self::Map(normalized)
    }

    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(Symbol::new(name))
    }

    /// An empty map.
    #[must_use]
    pub const fn empty_map() -> Self {
        Self::Map(Vec::new())
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short kind name used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::Decimal(_) => "decimal",
            Self::Float(_) => "float",
            Self::Int(_) => "integer",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Null => "nil",
            Self::Record(_) => "record",
            Self::Symbol(_) => "symbol",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
        }
    }

    /// Truthiness: only `Null` and `Bool(false)` are falsey.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Null | Self::Bool(false))
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        if let Self::Int(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&[(Self, Self)]> {
        if let Self::Map(entries) = self {
            Some(entries.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        if let Self::Record(record) = self {
            Some(record)
        } else {
            None
        }
    }

    /// Attribute name carried by a map key; text and symbols both qualify.
    #[must_use]
    pub fn key_name(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Symbol(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Look up a map entry by attribute name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Self> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.key_name() == Some(name))
            .map(|(_, v)| v)
    }

    /// Plain string form used by the string coercers (no quoting).
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(s) => s.clone(),
            Self::Symbol(s) => s.to_string(),
            Self::Float(f) => format!("{f:?}"),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => map_eq(a, b),
            (Self::Null, Self::Null) => true,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,

            // a nested record matches a mapping that builds an equal record
            (Self::Record(record), Self::Map(entries))
            | (Self::Map(entries), Self::Record(record)) => record.eq_mapping(entries),

            _ => false,
        }
    }
}

// order-insensitive; assumes unique keys on both sides
fn map_eq(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, value)| {
            b.iter()
                .find(|(other_key, _)| other_key == key)
                .is_some_and(|(_, other_value)| other_value == value)
        })
}

macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    Date      => Date,
    Decimal   => Decimal,
    bool      => Bool,
    f32       => Float,
    f64       => Float,
    i8        => Int,
    i16       => Int,
    i32       => Int,
    i64       => Int,
    u8        => Int,
    u16       => Int,
    u32       => Int,
    &str      => Text,
    String    => Text,
    Symbol    => Symbol,
    Timestamp => Timestamp,
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(Box::new(record))
    }
}

impl From<Vec<Self>> for Value {
    fn from(vec: Vec<Self>) -> Self {
        Self::List(vec)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}
