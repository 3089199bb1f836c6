//! ## Crate layout
//! - `core`: property registry, coercion, the write pipeline and read protocol,
//!   and the `Record` instance type.
//! - `definition`: struct types described as serde data and built at runtime.
//!
//! The `prelude` module covers declaring struct types and working with
//! records.

pub use hashstruct_core as core;

pub mod definition;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Re-exports
//

pub use core::{
    error::{CoerceError, CoercionFailure, Error, SchemaError},
    record::Record,
    struct_type::StructType,
    value::Value,
};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        core::prelude::*,
        definition::{DefinitionError, DefinitionSet, StructDefinition},
    };
}
