use crate::{
    coerce::{Builtin, Coercer},
    error::Error,
    schema::PropertyOptions,
    struct_type::StructType,
    value::Value,
};

/// Shorthand for a mapping with text keys.
pub(crate) fn map<V: Into<Value>>(entries: impl IntoIterator<Item = (&'static str, V)>) -> Value {
    Value::map(entries)
}

pub(crate) fn unwrap_type(result: Result<StructType, Error>) -> StructType {
    result.expect("struct type should build")
}

/// `Address { city: string }`
pub(crate) fn address() -> StructType {
    unwrap_type(
        StructType::builder("Address")
            .property("city", PropertyOptions::new().coerce(Builtin::String))
            .build(),
    )
}

/// `Person { name: string, address: Address = { city: "Denver" } }`
pub(crate) fn person() -> StructType {
    let address = address();

    unwrap_type(
        StructType::builder("Person")
            .property("name", PropertyOptions::new().coerce(Builtin::String).optional())
            .property(
                "address",
                PropertyOptions::new()
                    .coerce(&address)
                    .default(map([("city", "Denver")])),
            )
            .build(),
    )
}

/// Product with a readonly snapshot of the first price written.
pub(crate) fn product() -> StructType {
    unwrap_type(
        StructType::builder("Product")
            .property("name", PropertyOptions::new().coerce(Builtin::String))
            .property("price", PropertyOptions::new().coerce(Builtin::BigDecimal))
            .property("original_price", PropertyOptions::new().readonly(true))
            .after_writing_attribute("price", |record, value| {
                if record.get("original_price")?.is_null() {
                    record.set_with_override("original_price", value.clone())?;
                }
                Ok(())
            })
            .build(),
    )
}

/// Plain `Array[symbol]` coercer.
pub(crate) fn symbols() -> Coercer {
    Coercer::array_of(Builtin::Symbol)
}
