//! Single-line, inspect-style rendering used by `describe()` and by
//! coercion diagnostics.

use crate::value::Value;
use std::fmt::{self, Display, Write};

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Self::Map(entries) => {
                f.write_char('{')?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} => {value}")?;
                }
                f.write_char('}')
            }
            Self::Null => f.write_str("nil"),
            Self::Record(record) => write!(f, "{record}"),
            Self::Symbol(s) => write!(f, ":{s}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Timestamp(t) => write!(f, "{t}"),
        }
    }
}

///
/// Inspect
///
/// Adapter that renders a value through `Display` wherever a `Debug`
/// bound is required (pretty record output).
///

pub(crate) struct Inspect<'a>(pub(crate) &'a Value);

impl fmt::Debug for Inspect<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            // nested records keep pretty layout under `{:#?}`
            Value::Record(record) => fmt::Debug::fmt(record, f),
            other => write!(f, "{other}"),
        }
    }
}
