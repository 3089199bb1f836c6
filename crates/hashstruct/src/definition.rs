//! Declarative struct definitions.
//!
//! Struct types described as serde data (usually JSON) and built into
//! `StructType`s. Coercers are written the compact way:
//!
//! - `"big_decimal"` : a builtin tag, or the name of another struct type
//! - `["symbol"]`    : array of the inner coercer
//! - `{"symbol": "integer"}` : map with coerced keys and values

use hashstruct_core::{
    coerce::{Builtin, Coercer},
    schema::PropertyOptions,
    struct_type::{StructBuilder, StructType},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    ops::Not,
    sync::{Arc, OnceLock},
};
use thiserror::Error as ThisError;
use tracing::debug;

///
/// DefinitionError
///

#[derive(Debug, ThisError)]
pub enum DefinitionError {
    #[error("malformed definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("({type_name}) unknown coercer {coercer:?} for property {property:?}")]
    UnknownCoercer {
        type_name: String,
        property: String,
        coercer: String,
    },

    #[error("({type_name}) invalid coercer for property {property:?}: {reason}")]
    InvalidCoercer {
        type_name: String,
        property: String,
        reason: &'static str,
    },

    #[error("({type_name}) unknown parent type {parent:?}")]
    UnknownParent { type_name: String, parent: String },

    #[error("struct type {name:?} is defined more than once")]
    DuplicateType { name: String },

    #[error(transparent)]
    Struct(#[from] hashstruct_core::error::Error),
}

///
/// NameCase
///
/// Name transforms available to declarative definitions.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
    Lowercase,
    SnakeCase,
}

impl NameCase {
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Lowercase => name.to_lowercase(),
            Self::SnakeCase => snake_case(name),
        }
    }
}

// `firstName`, `First-Name` and `first name` all become `first_name`
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for c in name.chars() {
        if c == '-' || c == ' ' {
            out.push('_');
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    out
}

///
/// CoercerSpec
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CoercerSpec {
    Named(String),
    Array(Vec<Self>),
    Map(BTreeMap<String, Self>),
}

impl CoercerSpec {
    fn resolve<R>(&self, resolve: &R) -> Result<Coercer, SpecError>
    where
        R: Fn(&str) -> Option<Coercer>,
    {
        match self {
            Self::Named(name) => Builtin::from_tag(name)
                .map(Coercer::from)
                .or_else(|| resolve(name))
                .ok_or_else(|| SpecError::Unknown(name.clone())),
            Self::Array(inner) => match inner.as_slice() {
                [inner] => Ok(Coercer::array_of(inner.resolve(resolve)?)),
                _ => Err(SpecError::Invalid("an array coercer takes exactly one element")),
            },
            Self::Map(entries) => {
                let mut iter = entries.iter();
                match (iter.next(), iter.next()) {
                    (Some((key, value)), None) => Ok(Coercer::map_of(
                        Self::Named(key.clone()).resolve(resolve)?,
                        value.resolve(resolve)?,
                    )),
                    _ => Err(SpecError::Invalid("a map coercer takes exactly one entry")),
                }
            }
        }
    }
}

// detail of a failed coercer lookup, attributed by the caller
enum SpecError {
    Unknown(String),
    Invalid(&'static str),
}

impl SpecError {
    fn attribute(self, type_name: &str, property: &str) -> DefinitionError {
        match self {
            Self::Unknown(coercer) => DefinitionError::UnknownCoercer {
                type_name: type_name.to_string(),
                property: property.to_string(),
                coercer,
            },
            Self::Invalid(reason) => DefinitionError::InvalidCoercer {
                type_name: type_name.to_string(),
                property: property.to_string(),
                reason,
            },
        }
    }
}

///
/// PropertySpec
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PropertySpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coerce: Option<CoercerSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub readonly: bool,
}

///
/// StructDefinition
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StructDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<NameCase>,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub discard_unrecognized: bool,

    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

impl StructDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the struct type. `resolve` maps every non-builtin coercer name
    /// (and the parent named by `extends`) to a coercer.
    pub fn build<R>(&self, resolve: R) -> Result<StructType, DefinitionError>
    where
        R: Fn(&str) -> Option<Coercer>,
    {
        let mut builder = match &self.extends {
            Some(parent) => resolve(parent)
                .and_then(|coercer| match coercer {
                    Coercer::Struct(reference) => reference.resolve(),
                    _ => None,
                })
                .ok_or_else(|| DefinitionError::UnknownParent {
                    type_name: self.name.clone(),
                    parent: parent.clone(),
                })?
                .extend(self.name.clone()),
            None => StructType::builder(self.name.clone()),
        };

        if let Some(case) = self.transform {
            builder = builder.transform_property_names(move |name| case.apply(name));
        }
        if self.discard_unrecognized {
            builder = builder.discard_all_unrecognized_attributes(true);
        }
        for property in &self.properties {
            builder = self.declare(builder, property, &resolve)?;
        }

        let ty = builder.build()?;
        debug!(
            type_name = ty.name(),
            properties = ty.schema().properties().len(),
            "struct definition built"
        );

        Ok(ty)
    }

    fn declare<R>(
        &self,
        builder: StructBuilder,
        property: &PropertySpec,
        resolve: &R,
    ) -> Result<StructBuilder, DefinitionError>
    where
        R: Fn(&str) -> Option<Coercer>,
    {
        let mut options = PropertyOptions::new().aliases(property.aliases.iter().cloned());

        if let Some(spec) = &property.coerce {
            let coercer = spec
                .resolve(resolve)
                .map_err(|err| err.attribute(&self.name, &property.name))?;
            options = options.coerce(coercer);
        }
        if let Some(default) = &property.default {
            options = options.default(Value::from_json(default));
        }
        if let Some(required) = property.required {
            options = options.required(required);
        }
        if property.readonly {
            options = options.readonly(true);
        }

        Ok(builder.property(&property.name, options))
    }
}

///
/// DefinitionSet
///
/// A group of definitions that may refer to each other, including
/// themselves. Parents named by `extends` must appear earlier in the set.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DefinitionSet(pub Vec<StructDefinition>);

impl DefinitionSet {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build every definition, keyed by type name.
    pub fn build(&self) -> Result<BTreeMap<String, StructType>, DefinitionError> {
        let mut declared = Vec::with_capacity(self.0.len());
        for definition in &self.0 {
            if declared.contains(&definition.name.as_str()) {
                return Err(DefinitionError::DuplicateType {
                    name: definition.name.clone(),
                });
            }
            declared.push(definition.name.as_str());
        }

        // filled once every type exists; references that are not built yet
        // go through it
        let registry: Arc<OnceLock<BTreeMap<String, StructType>>> = Arc::new(OnceLock::new());
        let mut built: BTreeMap<String, StructType> = BTreeMap::new();

        for definition in &self.0 {
            let ty = definition.build(|name| {
                if let Some(ty) = built.get(name) {
                    return Some(Coercer::struct_type(ty));
                }
                if !declared.iter().any(|declared| *declared == name) {
                    return None;
                }

                let registry = Arc::clone(&registry);
                let key = name.to_string();
                Some(Coercer::deferred_lookup(name, move || {
                    registry.get().and_then(|types| types.get(&key)).cloned()
                }))
            })?;
            built.insert(definition.name.clone(), ty);
        }

        // fresh registry, so this set cannot fail
        let _ = registry.set(built.clone());

        Ok(built)
    }
}
