use crate::{
    error::{BoxError, Error},
    record::{Privileges, Record},
    schema::{PropertyOptions, PropertySchema},
    value::Value,
};
use std::{fmt, sync::Arc};

///
/// StructType
///
/// Published, immutable handle to a schema. Cheap to clone; every record
/// of the type shares the same schema.
///

#[derive(Clone)]
pub struct StructType(Arc<PropertySchema>);

impl StructType {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> StructBuilder {
        StructBuilder::from_schema(PropertySchema::new(name))
    }

    /// Start a subtype from an independent copy of this schema.
    #[must_use]
    pub fn extend(&self, child_name: impl Into<String>) -> StructBuilder {
        StructBuilder::from_schema(self.0.inherit_into(child_name))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.0.type_name()
    }

    #[must_use]
    pub fn schema(&self) -> &PropertySchema {
        &self.0
    }

    /// True when both handles point at the same published schema.
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Build a record from a mapping, or copy a record of this exact type.
    pub fn construct(&self, source: impl Into<Value>) -> Result<Record, Error> {
        self.construct_with(source.into(), Privileges::default())
    }

    pub(crate) fn construct_with(
        &self,
        source: Value,
        privileges: Privileges,
    ) -> Result<Record, Error> {
        Record::build(self.clone(), source, privileges)
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructType({})", self.name())
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for StructType {}

///
/// StructBuilder
///
/// Declaration-time builder. The first failing declaration is kept and
/// reported by `build`.
///

#[must_use]
pub struct StructBuilder {
    schema: PropertySchema,
    error: Option<Error>,
}

impl StructBuilder {
    const fn from_schema(schema: PropertySchema) -> Self {
        Self {
            schema,
            error: None,
        }
    }

    fn apply(mut self, f: impl FnOnce(&mut PropertySchema) -> Result<(), Error>) -> Self {
        if self.error.is_none()
            && let Err(err) = f(&mut self.schema)
        {
            self.error = Some(err);
        }

        self
    }

    pub fn property(self, name: &str, options: PropertyOptions) -> Self {
        self.apply(|schema| schema.declare(name, options).map(|_| ()))
    }

    pub fn alias_property(self, alias: &str, canonical: &str, readonly: bool) -> Self {
        self.apply(|schema| schema.alias_property(alias, canonical, readonly))
    }

    pub fn after_writing_attribute<F>(self, name: &str, callback: F) -> Self
    where
        F: Fn(&mut Record, &Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.apply(|schema| schema.after_writing_attribute(name, Arc::new(callback)))
    }

    pub fn transform_property_names<F>(self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.apply(|schema| {
            schema.set_transform(Arc::new(transform));
            Ok(())
        })
    }

    pub fn discard_all_unrecognized_attributes(self, discard: bool) -> Self {
        self.apply(|schema| {
            schema.set_discard_unrecognized(discard);
            Ok(())
        })
    }

    /// Replace construction with `hook` whenever this type coerces a value
    /// for another type's property.
    pub fn coerce_with<F>(self, hook: F) -> Self
    where
        F: Fn(&StructType, &Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.apply(|schema| {
            schema.set_coerce_hook(Arc::new(hook));
            Ok(())
        })
    }

    pub fn build(self) -> Result<StructType, Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(StructType(Arc::new(self.schema))),
        }
    }
}
