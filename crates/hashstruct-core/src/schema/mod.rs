//! Property registry: the ordered, alias-aware schema behind a struct type.

mod property;

#[cfg(test)]
mod tests;

pub use property::{AfterWrite, DefaultValue, PropertyDefinition, PropertyOptions, Reader};

use crate::{
    error::{BoxError, Error, SchemaError},
    struct_type::StructType,
    value::Value,
};
use std::{collections::HashMap, fmt, sync::Arc};

/// Normalizes incoming attribute names to canonical keys.
pub type NameTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Type-level coercion override used when this type is another property's
/// coercer.
pub type CoerceHook = Arc<dyn Fn(&StructType, &Value) -> Result<Value, BoxError> + Send + Sync>;

///
/// AliasEntry
///

#[derive(Clone, Debug)]
struct AliasEntry {
    canonical: String,
    // set only by `alias_property`; the property's own flag is checked on write
    readonly: bool,
}

///
/// Resolved
///
/// A property found by name, plus whether the name was a readonly alias.
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct Resolved<'a> {
    pub(crate) property: &'a PropertyDefinition,
    pub(crate) readonly_alias: bool,
}

///
/// PropertySchema
///

#[derive(Clone)]
pub struct PropertySchema {
    type_name: String,
    properties: Vec<PropertyDefinition>,
    alias_index: HashMap<String, AliasEntry>,
    transform: Option<NameTransform>,
    discard_unrecognized: bool,
    coerce_hook: Option<CoerceHook>,
}

impl PropertySchema {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            alias_index: HashMap::new(),
            transform: None,
            discard_unrecognized: false,
            coerce_hook: None,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Run `name` through the name transform.
    #[must_use]
    pub fn normalize(&self, name: &str) -> String {
        self.transform
            .as_ref()
            .map_or_else(|| name.to_string(), |transform| transform(name))
    }

    ///
    /// DECLARATION
    ///

    /// Declare a property, or merge `options` into the property already
    /// known by that name or alias. Returns the canonical name.
    pub fn declare(&mut self, name: &str, options: PropertyOptions) -> Result<String, Error> {
        let name = self.normalize(name);
        if name.is_empty() {
            return Err(SchemaError::EmptyName {
                type_name: self.type_name.clone(),
            }
            .into());
        }

        let aliases: Vec<String> = options.aliases.iter().map(|a| self.normalize(a)).collect();

        let canonical = match self.position(&name) {
            Some(index) => {
                let property = &mut self.properties[index];
                property.update(options);
                property.name().to_string()
            }
            None => {
                self.properties
                    .push(PropertyDefinition::new(name.clone(), options));
                name
            }
        };

        // declared aliases follow the property's own readonly flag
        for alias in aliases {
            self.insert_alias(&alias, &canonical, None)?;
        }

        Ok(canonical)
    }

    /// Point `alias` at an existing property. A readonly alias can be read
    /// but rejects ordinary writes, even when the property itself is writable.
    pub fn alias_property(
        &mut self,
        alias: &str,
        canonical: &str,
        readonly: bool,
    ) -> Result<(), Error> {
        self.insert_alias(alias, canonical, Some(readonly))
    }

    // `None` keeps the guard an existing entry already has
    fn insert_alias(
        &mut self,
        alias: &str,
        canonical: &str,
        readonly: Option<bool>,
    ) -> Result<(), Error> {
        let alias = self.normalize(alias);
        if alias.is_empty() {
            return Err(SchemaError::EmptyName {
                type_name: self.type_name.clone(),
            }
            .into());
        }

        let index = self
            .position(canonical)
            .ok_or_else(|| Error::unrecognized(&self.type_name, canonical))?;
        let target = self.properties[index].name().to_string();

        if alias == target {
            return Ok(());
        }
        if let Some(existing) = self.properties.iter().find(|p| p.name() == alias) {
            return Err(self.alias_conflict(&alias, existing.name()));
        }
        if let Some(entry) = self.alias_index.get(&alias)
            && entry.canonical != target
        {
            return Err(self.alias_conflict(&alias, &entry.canonical));
        }

        let readonly = readonly.unwrap_or_else(|| {
            self.alias_index
                .get(&alias)
                .is_some_and(|entry| entry.readonly)
        });
        self.alias_index.insert(
            alias.clone(),
            AliasEntry {
                canonical: target,
                readonly,
            },
        );
        self.properties[index].add_alias(alias);

        Ok(())
    }

    /// Append `callback` to the property's after-write list.
    pub fn after_writing_attribute(&mut self, name: &str, callback: AfterWrite) -> Result<(), Error> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::unrecognized(&self.type_name, name))?;
        self.properties[index].push_after_write(callback);

        Ok(())
    }

    pub fn set_transform(&mut self, transform: NameTransform) {
        self.transform = Some(transform);
    }

    pub const fn set_discard_unrecognized(&mut self, discard: bool) {
        self.discard_unrecognized = discard;
    }

    pub fn set_coerce_hook(&mut self, hook: CoerceHook) {
        self.coerce_hook = Some(hook);
    }

    /// Independent copy for a subtype; later declarations on either side
    /// never reach the other.
    #[must_use]
    pub fn inherit_into(&self, child_name: impl Into<String>) -> Self {
        Self {
            type_name: child_name.into(),
            ..self.clone()
        }
    }

    ///
    /// LOOKUP
    ///

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&PropertyDefinition> {
        self.resolve(name).map(|resolved| resolved.property)
    }

    pub fn lookup_or_fail(&self, name: &str) -> Result<&PropertyDefinition, Error> {
        self.lookup(name)
            .ok_or_else(|| Error::unrecognized(&self.type_name, name))
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    // transform, then alias index, then canonical names
    pub(crate) fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        let name = self.normalize(name);

        if let Some(entry) = self.alias_index.get(&name) {
            return self
                .properties
                .iter()
                .find(|p| p.name() == entry.canonical)
                .map(|property| Resolved {
                    property,
                    readonly_alias: entry.readonly,
                });
        }

        self.properties
            .iter()
            .find(|p| p.name() == name)
            .map(|property| Resolved {
                property,
                readonly_alias: false,
            })
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = self.normalize(name);
        let canonical = self
            .alias_index
            .get(&name)
            .map_or(name.as_str(), |entry| entry.canonical.as_str());

        self.properties.iter().position(|p| p.name() == canonical)
    }

    fn alias_conflict(&self, alias: &str, existing: &str) -> Error {
        SchemaError::AliasConflict {
            type_name: self.type_name.clone(),
            alias: alias.to_string(),
            existing: existing.to_string(),
        }
        .into()
    }

    ///
    /// VIEWS
    ///

    /// All properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    /// Writable properties that must be non-null once a record is built.
    pub fn required_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.writable_properties().filter(|p| p.is_required())
    }

    pub fn readonly_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties.iter().filter(|p| p.is_readonly())
    }

    pub fn writable_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties.iter().filter(|p| !p.is_readonly())
    }

    #[must_use]
    pub const fn discard_unrecognized(&self) -> bool {
        self.discard_unrecognized
    }

    #[must_use]
    pub const fn coerce_hook(&self) -> Option<&CoerceHook> {
        self.coerce_hook.as_ref()
    }
}

impl fmt::Debug for PropertySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySchema")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .field("aliases", &self.alias_index.keys().collect::<Vec<_>>())
            .field("transform", &self.transform.is_some())
            .field("discard_unrecognized", &self.discard_unrecognized)
            .field("coerce_hook", &self.coerce_hook.is_some())
            .finish()
    }
}
