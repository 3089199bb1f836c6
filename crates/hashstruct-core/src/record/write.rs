//! Single-attribute write pipeline.
//!
//! resolve -> ensure_writable -> coerce -> ensure_required -> commit ->
//! fire_after_write. Each stage fails fast; nothing is stored unless every
//! stage before `commit` succeeds.

use crate::{
    coerce::{self, CoerceContext},
    error::Error,
    record::Record,
    schema::{PropertyDefinition, PropertySchema, Resolved},
    value::Value,
};
use tracing::trace;

pub(super) fn write_attribute(
    record: &mut Record,
    name: &str,
    value: Value,
    override_readonly: bool,
) -> Result<(), Error> {
    // the handle is cloned so callbacks can borrow the record mutably
    let ty = record.ty.clone();
    let schema = ty.schema();

    let resolved = resolve(schema, name)?;
    let property = resolved.property;
    ensure_writable(record, schema, resolved, name, override_readonly)?;
    let value = coerce_value(record, schema, property, value)?;
    ensure_required(schema, property, &value)?;
    commit(record, property, value);

    fire_after_write(record, property)
}

fn resolve<'a>(schema: &'a PropertySchema, name: &str) -> Result<Resolved<'a>, Error> {
    schema
        .resolve(name)
        .ok_or_else(|| Error::unrecognized(schema.type_name(), name))
}

fn ensure_writable(
    record: &Record,
    schema: &PropertySchema,
    resolved: Resolved<'_>,
    name: &str,
    override_readonly: bool,
) -> Result<(), Error> {
    let guarded = resolved.property.is_readonly() || resolved.readonly_alias;

    if guarded && !override_readonly && !record.privileges.allow_writing_readonly {
        return Err(Error::readonly(schema.type_name(), name));
    }

    Ok(())
}

// null passes through untouched unless the coercer is boolean
fn coerce_value(
    record: &Record,
    schema: &PropertySchema,
    property: &PropertyDefinition,
    value: Value,
) -> Result<Value, Error> {
    let Some(coercer) = property.coercer() else {
        return Ok(value);
    };
    if value.is_null() && !coercer.is_boolean() {
        return Ok(value);
    }

    let ctx = CoerceContext {
        type_name: schema.type_name(),
        property,
        allow_writing_readonly: record.privileges.allow_writing_readonly,
    };

    coerce::coerce(&ctx, coercer, &value)
}

fn ensure_required(
    schema: &PropertySchema,
    property: &PropertyDefinition,
    value: &Value,
) -> Result<(), Error> {
    if property.is_required() && value.is_null() && !property.coerces_as_boolean() {
        return Err(Error::missing_required(
            schema.type_name(),
            property.name(),
            property.aliases(),
        ));
    }

    Ok(())
}

fn commit(record: &mut Record, property: &PropertyDefinition, value: Value) {
    trace!(
        type_name = record.type_name(),
        property = property.name(),
        value = %value,
        "attribute written"
    );

    record.written.insert(property.name().to_string(), value);
}

fn fire_after_write(record: &mut Record, property: &PropertyDefinition) -> Result<(), Error> {
    let callbacks = property.after_write_callbacks();
    if callbacks.is_empty() {
        return Ok(());
    }

    let committed = record
        .written
        .get(property.name())
        .cloned()
        .unwrap_or(Value::Null);

    for callback in callbacks {
        callback(record, &committed)?;
    }

    Ok(())
}
