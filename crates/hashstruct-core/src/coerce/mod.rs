//! Coercion engine: resolves a coercer against a value.
//!
//! Dispatch order is fixed: builtin, array-of, map-of, callable, struct type
//! (custom hook first, construction second), then any other named
//! constructor.

mod builtin;

#[cfg(test)]
mod tests;

pub use builtin::Builtin;

use crate::{
    error::{BoxError, CoerceError, CoercionFailure, Error},
    record::Privileges,
    schema::PropertyDefinition,
    struct_type::StructType,
    value::Value,
};
use std::{
    fmt,
    sync::{Arc, OnceLock},
};

/// User-supplied value conversion.
pub type CoerceFn = Arc<dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync>;

///
/// Coercer
///
/// Explicit tagged union over every supported coercer shape. Each shape
/// knows how to describe itself for diagnostics.
///

#[derive(Clone)]
pub enum Coercer {
    Builtin(Builtin),
    ArrayOf(Box<Self>),
    MapOf(Box<Self>, Box<Self>),
    Callable(CoerceFn),
    Struct(StructRef),
    Class(ClassCoercer),
}

impl Coercer {
    ///
    /// CONSTRUCTION
    ///

    #[must_use]
    pub fn array_of(inner: impl Into<Self>) -> Self {
        Self::ArrayOf(Box::new(inner.into()))
    }

    #[must_use]
    pub fn map_of(key: impl Into<Self>, value: impl Into<Self>) -> Self {
        Self::MapOf(Box::new(key.into()), Box::new(value.into()))
    }

    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    /// Named single-argument constructor for a non-record type.
    pub fn class<F>(name: impl Into<String>, construct: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self::Class(ClassCoercer {
            name: name.into(),
            construct: Arc::new(construct),
        })
    }

    /// Struct coercer bound to an already-built type.
    #[must_use]
    pub fn struct_type(ty: &StructType) -> Self {
        Self::Struct(StructRef::Bound(ty.clone()))
    }

    /// Struct coercer resolved on first use. Lets a type refer to itself
    /// (or to a type declared later) through a static handle.
    pub fn deferred<F>(name: impl Into<String>, resolve: F) -> Self
    where
        F: Fn() -> StructType + Send + Sync + 'static,
    {
        Self::deferred_lookup(name, move || Some(resolve()))
    }

    /// Like `deferred`, for registries that may not hold the type yet.
    /// Coercion fails with `UndefinedStruct` while the lookup yields `None`.
    pub fn deferred_lookup<F>(name: impl Into<String>, lookup: F) -> Self
    where
        F: Fn() -> Option<StructType> + Send + Sync + 'static,
    {
        Self::Struct(StructRef::Deferred(Arc::new(DeferredStruct {
            name: name.into(),
            lookup: Box::new(lookup),
            resolved: OnceLock::new(),
        })))
    }

    ///
    /// INTROSPECTION
    ///

    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, Self::Builtin(Builtin::Boolean))
    }

    /// Human-readable rendering used in coercion failures.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Builtin(builtin) => builtin.tag().to_string(),
            Self::ArrayOf(inner) => format!("Array[{}]", inner.describe()),
            Self::MapOf(key, value) => format!("Hash[{} => {}]", key.describe(), value.describe()),
            Self::Callable(_) => "a custom proc".to_string(),
            Self::Struct(reference) => reference.name().to_string(),
            Self::Class(class) => class.name.clone(),
        }
    }

    ///
    /// APPLICATION
    ///

    /// Coerce `value`, propagating write privilege into nested records.
    pub(crate) fn apply(
        &self,
        value: &Value,
        allow_writing_readonly: bool,
    ) -> Result<Value, CoerceError> {
        match self {
            Self::Builtin(builtin) => builtin.apply(value),
            Self::ArrayOf(inner) => match value {
                Value::List(items) => items
                    .iter()
                    .map(|item| inner.apply(item, allow_writing_readonly))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List),
                other => Err(CoerceError::unexpected("list", other.kind_name())),
            },
            Self::MapOf(key_coercer, value_coercer) => match value {
                Value::Map(entries) => {
                    let mut coerced = Vec::with_capacity(entries.len());
                    for (key, item) in entries {
                        coerced.push((
                            key_coercer.apply(key, allow_writing_readonly)?,
                            value_coercer.apply(item, allow_writing_readonly)?,
                        ));
                    }
                    Ok(Value::from_entries(coerced))
                }
                other => Err(CoerceError::unexpected("map", other.kind_name())),
            },
            Self::Callable(f) => f(value).map_err(CoerceError::Custom),
            Self::Struct(reference) => {
                let ty = reference
                    .resolve()
                    .ok_or_else(|| CoerceError::UndefinedStruct {
                        name: reference.name().to_string(),
                    })?;
                match ty.schema().coerce_hook() {
                    Some(hook) => hook(&ty, value).map_err(CoerceError::Custom),
                    None => {
                        let privileges = Privileges {
                            allow_reading_readonly: false,
                            allow_writing_readonly,
                        };
                        ty.construct_with(value.clone(), privileges)
                            .map(Value::from)
                            .map_err(|err| CoerceError::Struct(Box::new(err)))
                    }
                }
            }
            Self::Class(class) => (class.construct)(value).map_err(CoerceError::Custom),
        }
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coercer({})", self.describe())
    }
}

impl From<Builtin> for Coercer {
    fn from(builtin: Builtin) -> Self {
        Self::Builtin(builtin)
    }
}

impl From<&StructType> for Coercer {
    fn from(ty: &StructType) -> Self {
        Self::struct_type(ty)
    }
}

impl From<StructType> for Coercer {
    fn from(ty: StructType) -> Self {
        Self::Struct(StructRef::Bound(ty))
    }
}

///
/// StructRef
///
/// Reference to a struct type used as a coercer, either bound now or
/// resolved lazily.
///

#[derive(Clone)]
pub enum StructRef {
    Bound(StructType),
    Deferred(Arc<DeferredStruct>),
}

impl StructRef {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bound(ty) => ty.name(),
            Self::Deferred(deferred) => &deferred.name,
        }
    }

    /// The referenced type; a deferred reference is cached once found.
    #[must_use]
    pub fn resolve(&self) -> Option<StructType> {
        match self {
            Self::Bound(ty) => Some(ty.clone()),
            Self::Deferred(deferred) => {
                if let Some(ty) = deferred.resolved.get() {
                    return Some(ty.clone());
                }
                let ty = (deferred.lookup)()?;

                Some(deferred.resolved.get_or_init(|| ty).clone())
            }
        }
    }
}

///
/// DeferredStruct
///

pub struct DeferredStruct {
    name: String,
    lookup: Box<dyn Fn() -> Option<StructType> + Send + Sync>,
    resolved: OnceLock<StructType>,
}

///
/// ClassCoercer
///

#[derive(Clone)]
pub struct ClassCoercer {
    pub name: String,
    pub construct: CoerceFn,
}

///
/// CoerceContext
///
/// Attribution for a coercion run on behalf of one property write.
///

pub(crate) struct CoerceContext<'a> {
    pub(crate) type_name: &'a str,
    pub(crate) property: &'a PropertyDefinition,
    pub(crate) allow_writing_readonly: bool,
}

/// Run `coercer` on `value`, wrapping any failure as a `CoercionFailure`.
pub(crate) fn coerce(
    ctx: &CoerceContext<'_>,
    coercer: &Coercer,
    value: &Value,
) -> Result<Value, Error> {
    coercer
        .apply(value, ctx.allow_writing_readonly)
        .map_err(|source| {
            Error::from(CoercionFailure {
                type_name: ctx.type_name.to_string(),
                property: ctx.property.name().to_string(),
                required: ctx.property.is_required(),
                coercer: coercer.describe(),
                value: value.to_string(),
                source,
            })
        })
}
