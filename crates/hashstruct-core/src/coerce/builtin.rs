use crate::{
    error::CoerceError,
    types::{Date, Decimal, Symbol, Timestamp},
    value::Value,
};
use std::fmt::{self, Display};

///
/// Builtin
///
/// Named scalar coercers. The tag is the stable name used in declarative
/// definitions and in coercion diagnostics.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Builtin {
    Array,
    BigDecimal,
    Boolean,
    Float,
    Integer,
    NonBlankString,
    String,
    Symbol,
    TimeInUtc,
}

impl Builtin {
    pub const ALL: [Self; 9] = [
        Self::Array,
        Self::BigDecimal,
        Self::Boolean,
        Self::Float,
        Self::Integer,
        Self::NonBlankString,
        Self::String,
        Self::Symbol,
        Self::TimeInUtc,
    ];

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::BigDecimal => "big_decimal",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::NonBlankString => "non_blank_string",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::TimeInUtc => "time_in_utc",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.tag() == tag)
    }

    /// Apply this coercer to `value`.
    pub fn apply(self, value: &Value) -> Result<Value, CoerceError> {
        match self {
            Self::Array => Ok(to_array(value)),
            Self::BigDecimal => to_big_decimal(value),
            Self::Boolean => Ok(Value::Bool(value.is_truthy())),
            Self::Float => to_float(value),
            Self::Integer => to_integer(value),
            Self::NonBlankString => Ok(to_non_blank_string(value)),
            Self::String => Ok(to_string(value)),
            Self::Symbol => to_symbol(value),
            Self::TimeInUtc => to_time_in_utc(value),
        }
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn to_array(value: &Value) -> Value {
    match value {
        Value::List(_) => value.clone(),
        Value::Null => Value::List(Vec::new()),
        Value::Map(entries) => Value::List(
            entries
                .iter()
                .map(|(k, v)| Value::List(vec![k.clone(), v.clone()]))
                .collect(),
        ),
        scalar => Value::List(vec![scalar.clone()]),
    }
}

fn to_big_decimal(value: &Value) -> Result<Value, CoerceError> {
    match value {
        Value::Decimal(_) => Ok(value.clone()),
        Value::Int(i) => Ok(Value::Decimal(Decimal::from_i64(*i))),
        Value::Float(f) => Err(CoerceError::FloatPrecision { value: *f }),
        Value::Text(s) => Decimal::parse(s)
            .map(Value::Decimal)
            .map_err(|_| CoerceError::InvalidNumber {
                target: "decimal",
                input: s.clone(),
            }),
        other => Err(CoerceError::unexpected("decimal", other.kind_name())),
    }
}

#[expect(clippy::cast_precision_loss)]
fn to_float(value: &Value) -> Result<Value, CoerceError> {
    match value {
        Value::Float(_) => Ok(value.clone()),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Decimal(d) => d
            .to_f64()
            .map(Value::Float)
            .ok_or_else(|| CoerceError::InvalidNumber {
                target: "float",
                input: d.to_string(),
            }),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| CoerceError::InvalidNumber {
                target: "float",
                input: s.clone(),
            }),
        other => Err(CoerceError::unexpected("float", other.kind_name())),
    }
}

// i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
const I64_LOWER_F64: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER_F64: f64 = 9_223_372_036_854_775_808.0;

#[expect(clippy::cast_possible_truncation)]
fn to_integer(value: &Value) -> Result<Value, CoerceError> {
    match value {
        Value::Int(_) => Ok(value.clone()),
        Value::Float(f) => {
            let truncated = f.trunc();
            if truncated.is_finite() && (I64_LOWER_F64..I64_UPPER_F64).contains(&truncated) {
                Ok(Value::Int(truncated as i64))
            } else {
                Err(CoerceError::InvalidNumber {
                    target: "integer",
                    input: format!("{f:?}"),
                })
            }
        }
        Value::Decimal(d) => {
            d.trunc_to_i64()
                .map(Value::Int)
                .ok_or_else(|| CoerceError::InvalidNumber {
                    target: "integer",
                    input: d.to_string(),
                })
        }
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| CoerceError::InvalidNumber {
                target: "integer",
                input: s.clone(),
            }),
        other => Err(CoerceError::unexpected("integer", other.kind_name())),
    }
}

fn to_non_blank_string(value: &Value) -> Value {
    let s = value.to_plain_string();

    if s.is_empty() { Value::Null } else { Value::Text(s) }
}

fn to_string(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        other => Value::Text(other.to_plain_string()),
    }
}

fn to_symbol(value: &Value) -> Result<Value, CoerceError> {
    match value {
        Value::Symbol(_) => Ok(value.clone()),
        Value::Text(s) => Ok(Value::Symbol(Symbol::new(s.clone()))),
        other => Err(CoerceError::unexpected("symbol", other.kind_name())),
    }
}

fn to_time_in_utc(value: &Value) -> Result<Value, CoerceError> {
    match value {
        Value::Timestamp(t) => Ok(Value::Timestamp(t.to_utc())),
        Value::Date(d) => Ok(Value::Timestamp(Timestamp::from_date(*d))),
        Value::Text(s) => {
            let s = s.trim();

            Timestamp::parse_rfc3339(s)
                .map(Timestamp::to_utc)
                .or_else(|_| Date::parse_iso8601(s).map(Timestamp::from_date))
                .map(Value::Timestamp)
                .map_err(|_| CoerceError::InvalidTime {
                    input: s.to_string(),
                })
        }
        other => Err(CoerceError::unexpected("time", other.kind_name())),
    }
}
