use crate::{
    error::Error,
    record::{Attributes, Record},
    schema::PropertyDefinition,
    value::Value,
};

/// Resolve `name` and read it through the read protocol.
pub(super) fn read_attribute(record: &Record, name: &str) -> Result<Value, Error> {
    let schema = record.ty.schema();
    let property = schema
        .lookup(name)
        .ok_or_else(|| Error::unrecognized(schema.type_name(), name))?;

    Ok(read_property(record, property))
}

// computed readonly value, else stored value, else null
fn read_property(record: &Record, property: &PropertyDefinition) -> Value {
    if property.is_readonly()
        && !record.privileges.allow_reading_readonly
        && let Some(reader) = property.reader()
    {
        return reader(record);
    }

    record
        .written
        .get(property.name())
        .cloned()
        .unwrap_or(Value::Null)
}

impl Record {
    /// Writable attributes, read fresh, keyed by canonical name.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.collect(self.ty.schema().writable_properties(), false)
    }

    /// Every declared property, plus each alias as a duplicate key.
    #[must_use]
    pub fn full_attributes(&self) -> Attributes {
        self.collect(self.ty.schema().properties().iter(), true)
    }

    /// Readonly attributes only, keyed by canonical name.
    #[must_use]
    pub fn readonly_attributes(&self) -> Attributes {
        self.collect(self.ty.schema().readonly_properties(), false)
    }

    fn collect<'a>(
        &self,
        properties: impl Iterator<Item = &'a PropertyDefinition>,
        with_aliases: bool,
    ) -> Attributes {
        let mut out = Attributes::new();

        for property in properties {
            let value = read_property(self, property);
            if with_aliases {
                for alias in property.aliases() {
                    out.insert(alias.clone(), value.clone());
                }
            }
            out.insert(property.name().to_string(), value);
        }

        out
    }
}
