use crate::{
    error::Error,
    record::{Privileges, Record, write},
    struct_type::StructType,
    value::Value,
};
use tracing::debug;

impl Record {
    pub(crate) fn build(
        ty: StructType,
        source: Value,
        privileges: Privileges,
    ) -> Result<Self, Error> {
        match source {
            // same type: adopt the already-validated attributes as they are
            Value::Record(other) if other.ty.is_same(&ty) => Ok(Self {
                ty,
                written: other.written,
                privileges,
            }),
            Value::Record(other) => {
                let entries = other
                    .attributes()
                    .into_iter()
                    .map(|(name, value)| (Value::Text(name), value))
                    .collect();
                from_mapping(ty, entries, privileges)
            }
            Value::Map(entries) => from_mapping(ty, entries, privileges),
            Value::Null => from_mapping(ty, Vec::new(), privileges),
            other => Err(Error::InvalidSource {
                type_name: ty.name().to_string(),
                found: other.kind_name(),
            }),
        }
    }
}

fn from_mapping(
    ty: StructType,
    entries: Vec<(Value, Value)>,
    privileges: Privileges,
) -> Result<Record, Error> {
    let schema = ty.schema();
    let discard = schema.discard_unrecognized();
    let mut record = Record::empty(ty.clone(), privileges);

    // normalize caller keys, dropping unknown ones when discarding
    let mut incoming = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let Some(name) = key.key_name() else {
            if discard {
                continue;
            }
            return Err(Error::unrecognized(schema.type_name(), key.to_string()));
        };

        let name = schema.normalize(name);
        if discard && !schema.has_property(&name) {
            continue;
        }
        incoming.push((name, value));
    }

    // readonly defaults are resolved once and stored; a null default stays unwritten
    let readonly_defaults: Vec<(String, Value)> = schema
        .readonly_properties()
        .filter_map(|property| {
            property
                .default_value()
                .map(|default| (property.name().to_string(), default.resolve(&record)))
        })
        .filter(|(_, value)| !value.is_null())
        .collect();
    for (name, value) in readonly_defaults {
        write::write_attribute(&mut record, &name, value, true)?;
    }

    // writable defaults next, caller entries on top
    let mut assignments: Vec<(String, Value)> = schema
        .writable_properties()
        .filter_map(|property| {
            property
                .default_value()
                .map(|default| (property.name().to_string(), default.resolve(&record)))
        })
        .collect();
    // an entry given by alias still replaces the canonical default
    let canonical = |name: &str| schema.lookup(name).map(|property| property.name());
    for (name, value) in incoming {
        let key = canonical(&name);
        let slot = assignments
            .iter_mut()
            .find(|(existing, _)| key.is_some() && canonical(existing.as_str()) == key);
        match slot {
            Some(slot) => *slot = (name, value),
            None => assignments.push((name, value)),
        }
    }

    for (name, value) in assignments {
        write::write_attribute(&mut record, &name, value, false)?;
    }

    // properties with no value and no default were never written
    for property in schema.required_properties() {
        if record.get(property.name())?.is_null() {
            return Err(Error::missing_required(
                schema.type_name(),
                property.name(),
                property.aliases(),
            ));
        }
    }

    debug!(
        type_name = schema.type_name(),
        written = record.written.len(),
        "record constructed"
    );

    Ok(record)
}
