use std::fmt;
use thiserror::Error as ThisError;

/// Boxed error returned by user-supplied coercion callables.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

///
/// Error
///
/// Every failure raised while declaring, constructing, reading or writing a
/// record. None are retried internally; only record equality downgrades
/// them to `false`.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("({type_name}) Unrecognized property {name:?}.")]
    UnrecognizedProperty { type_name: String, name: String },

    #[error("({type_name}) Couldn't write readonly attribute {name:?}.")]
    ReadonlyViolation { type_name: String, name: String },

    #[error(
        "({type_name}) Required property {name:?}{} was missing or set to nil.",
        render_aliases(.aliases)
    )]
    MissingRequiredProperty {
        type_name: String,
        name: String,
        aliases: Vec<String>,
    },

    #[error(transparent)]
    Coercion(#[from] CoercionFailure),

    #[error("({type_name}) Cannot build a record from {found}; expected a mapping or a {type_name} record.")]
    InvalidSource {
        type_name: String,
        found: &'static str,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl Error {
    pub(crate) fn unrecognized(type_name: &str, name: impl Into<String>) -> Self {
        Self::UnrecognizedProperty {
            type_name: type_name.to_string(),
            name: name.into(),
        }
    }

    pub(crate) fn readonly(type_name: &str, name: impl Into<String>) -> Self {
        Self::ReadonlyViolation {
            type_name: type_name.to_string(),
            name: name.into(),
        }
    }

    pub(crate) fn missing_required(type_name: &str, name: &str, aliases: &[String]) -> Self {
        Self::MissingRequiredProperty {
            type_name: type_name.to_string(),
            name: name.to_string(),
            aliases: aliases.to_vec(),
        }
    }

    /// Coercion failure detail, if this is one.
    #[must_use]
    pub const fn as_coercion(&self) -> Option<&CoercionFailure> {
        match self {
            Self::Coercion(failure) => Some(failure),
            _ => None,
        }
    }
}

fn render_aliases(aliases: &[String]) -> String {
    if aliases.is_empty() {
        return String::new();
    }

    let quoted: Vec<String> = aliases.iter().map(|a| format!("{a:?}")).collect();
    format!(" ({})", quoted.join(", "))
}

///
/// CoercionFailure
///
/// A coercer rejected a value. Carries enough context to render a single
/// human-readable line; the collaborator-level error stays reachable through
/// `source()`.
///

#[derive(Debug)]
pub struct CoercionFailure {
    pub type_name: String,
    pub property: String,
    pub required: bool,
    pub coercer: String,
    pub value: String,
    pub source: CoerceError,
}

impl fmt::Display for CoercionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qualifier = if self.required {
            "required property"
        } else {
            "property"
        };

        write!(
            f,
            "({}) Could not coerce {} for {qualifier} {:?} using {}: {} ({})",
            self.type_name,
            self.value,
            self.property,
            self.coercer,
            self.source,
            self.source.kind()
        )
    }
}

impl std::error::Error for CoercionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

///
/// CoerceError
///
/// Raw failure from a single coercer, before it is attributed to a
/// property.
///

#[derive(Debug, ThisError)]
pub enum CoerceError {
    #[error("no implicit conversion of {found} into {target}")]
    UnexpectedType {
        target: &'static str,
        found: &'static str,
    },

    #[error("invalid value for {target}: {input:?}")]
    InvalidNumber { target: &'static str, input: String },

    #[error("can't omit precision for a Float: {value:?} has no exact decimal form")]
    FloatPrecision { value: f64 },

    #[error("invalid date or time: {input:?}")]
    InvalidTime { input: String },

    #[error("struct type {name:?} is not defined")]
    UndefinedStruct { name: String },

    #[error(transparent)]
    Struct(Box<Error>),

    #[error("{0}")]
    Custom(BoxError),
}

impl CoerceError {
    /// Stable name of the failure kind, appended to coercion messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnexpectedType { .. } => "UnexpectedType",
            Self::InvalidNumber { .. } => "InvalidNumber",
            Self::FloatPrecision { .. } => "FloatPrecision",
            Self::InvalidTime { .. } => "InvalidTime",
            Self::UndefinedStruct { .. } => "UndefinedStruct",
            Self::Struct(_) => "StructError",
            Self::Custom(_) => "CustomError",
        }
    }

    pub(crate) const fn unexpected(target: &'static str, found: &'static str) -> Self {
        Self::UnexpectedType { target, found }
    }
}

///
/// SchemaError
///
/// Declaration-time failures. Raised while a struct type is being built,
/// never once records exist.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("({type_name}) Alias {alias:?} already refers to property {existing:?}.")]
    AliasConflict {
        type_name: String,
        alias: String,
        existing: String,
    },

    #[error("({type_name}) Property names must not be empty.")]
    EmptyName { type_name: String },
}
