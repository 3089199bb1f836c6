//! Struct instances: construction, reads, writes, equality and projection.

mod construct;
mod equality;
mod read;
mod serialize;
mod write;


use crate::{
    error::Error,
    struct_type::StructType,
    value::{Inspect, Value},
};
use std::{collections::BTreeMap, fmt};

/// Attribute name to value, sorted by name.
pub type Attributes = BTreeMap<String, Value>;

///
/// Privileges
///
/// Elevated access used only while building comparison containers and the
/// nested records they contain.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Privileges {
    pub(crate) allow_reading_readonly: bool,
    pub(crate) allow_writing_readonly: bool,
}

impl Privileges {
    pub(crate) const ELEVATED: Self = Self {
        allow_reading_readonly: true,
        allow_writing_readonly: true,
    };
}

///
/// Record
///
/// A struct instance. Holds the coerced values written so far, keyed by
/// canonical name.
///

#[derive(Clone)]
pub struct Record {
    ty: StructType,
    written: Attributes,
    privileges: Privileges,
}

impl Record {
    const fn empty(ty: StructType, privileges: Privileges) -> Self {
        Self {
            ty,
            written: BTreeMap::new(),
            privileges,
        }
    }

    #[must_use]
    pub const fn struct_type(&self) -> &StructType {
        &self.ty
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.ty.schema().has_property(name)
    }

    ///
    /// ACCESS
    ///

    /// Read an attribute by canonical name or alias.
    pub fn get(&self, name: &str) -> Result<Value, Error> {
        read::read_attribute(self, name)
    }

    /// Write an attribute by canonical name or alias.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        write::write_attribute(self, name, value.into(), false)
    }

    /// Write an attribute, bypassing the readonly guard.
    pub fn set_with_override(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        write::write_attribute(self, name, value.into(), true)
    }

    /// Raw written values, keyed by canonical name.
    #[must_use]
    pub const fn written_attributes(&self) -> &Attributes {
        &self.written
    }

    /// New record of the same type from this record's writable attributes
    /// overlaid with `partial`. Readonly attributes are never carried over.
    pub fn merge(&self, partial: impl Into<Value>) -> Result<Self, Error> {
        let partial = partial.into();
        let overlay = match &partial {
            Value::Map(entries) => entries.clone(),
            Value::Null => Vec::new(),
            other => {
                return Err(Error::InvalidSource {
                    type_name: self.type_name().to_string(),
                    found: other.kind_name(),
                });
            }
        };

        let mut entries: Vec<(Value, Value)> = self
            .attributes()
            .into_iter()
            .map(|(name, value)| (Value::Text(name), value))
            .collect();
        entries.extend(overlay);

        tracing::debug!(type_name = self.type_name(), "merging record");

        self.ty.construct(Value::from_entries(entries))
    }

    ///
    /// INTROSPECTION
    ///

    /// Names in the full attribute view, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.full_attributes().into_keys().collect()
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.full_attributes().contains_key(name)
    }

    /// Value under `name` in the full attribute view; unlike `get`, no
    /// transform or alias resolution is applied.
    #[must_use]
    pub fn fetch(&self, name: &str) -> Option<Value> {
        self.full_attributes().remove(name)
    }

    /// Subset of the full attribute view; unknown names are skipped.
    #[must_use]
    pub fn slice(&self, names: &[&str]) -> Attributes {
        let mut full = self.full_attributes();

        names
            .iter()
            .filter_map(|name| full.remove_entry(*name))
            .collect()
    }

    /// Follow `path` through nested records and maps.
    #[must_use]
    pub fn dig(&self, path: &[&str]) -> Option<Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.fetch(first)?;

        for segment in rest {
            current = match &current {
                Value::Record(record) => record.fetch(segment)?,
                Value::Map(_) => current.get(segment)?.clone(),
                _ => return None,
            };
        }

        Some(current)
    }

    /// Single-line rendering, e.g. `#<Person age: 3, name: "Ann">`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the space follows the type name even with no attributes: `#<Empty >`
        write!(f, "#<{} ", self.type_name())?;
        for (i, (name, value)) in self.full_attributes().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str(">")
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.full_attributes();
        let mut out = f.debug_struct(self.type_name());
        for (name, value) in &full {
            out.field(name, &Inspect(value));
        }
        out.finish()
    }
}
