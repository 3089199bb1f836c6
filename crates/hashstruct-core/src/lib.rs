//! Core engine for HashStruct: property registry, coercion, the write
//! pipeline and read protocol, and the record type built on top of them.

#![warn(unreachable_pub)]

// public exports are one module level down
pub mod coerce;
pub mod error;
pub mod record;
pub mod schema;
pub mod struct_type;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Declaration and instance vocabulary only.
///

pub mod prelude {
    pub use crate::{
        coerce::{Builtin, Coercer},
        error::Error,
        record::Record,
        schema::{DefaultValue, PropertyOptions},
        struct_type::{StructBuilder, StructType},
        types::{Date, Decimal, Symbol, Timestamp},
        value::Value,
    };
}
