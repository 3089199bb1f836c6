use crate::{coerce::Coercer, error::Error, record::Record, value::Value};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Computation that replaces the stored-value lookup for a readonly property.
pub type Reader = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// Callback fired after a property is committed; may write further
/// attributes on the same record.
pub type AfterWrite = Arc<dyn Fn(&mut Record, &Value) -> Result<(), Error> + Send + Sync>;

///
/// DefaultValue
///
/// Literal default, or a generator evaluated against the record under
/// construction.
///

#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Generator(Reader),
}

impl DefaultValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Zero-argument generator, re-run for every new record.
    pub fn generate<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::Generator(Arc::new(move |_: &Record| f()))
    }

    /// Generator that inspects the record under construction.
    pub fn from_record<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self::Generator(Arc::new(f))
    }

    // readonly properties without a default read as null until forced
    pub(crate) fn noop() -> Self {
        Self::Generator(Arc::new(|_: &Record| Value::Null))
    }

    pub(crate) fn resolve(&self, record: &Record) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Generator(f) => f(record),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "Literal({value})"),
            Self::Generator(_) => f.write_str("Generator"),
        }
    }
}

///
/// PropertyOptions
///
/// Options supplied to a declaration. Fields left unset keep their current
/// value when a property is re-declared.
///

#[derive(Clone, Default)]
pub struct PropertyOptions {
    pub(crate) aliases: Vec<String>,
    pub(crate) coercer: Option<Coercer>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) required: Option<bool>,
    pub(crate) readonly: Option<bool>,
    pub(crate) reader: Option<Reader>,
}

impl PropertyOptions {
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(name.into());
        self
    }

    #[must_use]
    pub fn aliases<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn coerce(mut self, coercer: impl Into<Coercer>) -> Self {
        self.coercer = Some(coercer.into());
        self
    }

    /// Literal default.
    #[must_use]
    pub fn default(self, value: impl Into<Value>) -> Self {
        self.default_with(DefaultValue::Literal(value.into()))
    }

    #[must_use]
    pub fn default_with(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Shorthand for `required(false)`.
    #[must_use]
    pub const fn optional(self) -> Self {
        self.required(false)
    }

    #[must_use]
    pub const fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = Some(readonly);
        self
    }

    #[must_use]
    pub fn reader<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.reader = Some(Arc::new(f));
        self
    }
}

///
/// PropertyDefinition
///
/// A declared slot on a struct type. Identity is the canonical name only.
///

#[derive(Clone)]
pub struct PropertyDefinition {
    name: String,
    aliases: Vec<String>,
    required: bool,
    readonly: bool,
    default: Option<DefaultValue>,
    coercer: Option<Coercer>,
    reader: Option<Reader>,
    after_write: Vec<AfterWrite>,
    // the default is the no-op filled in for a readonly property
    implicit_default: bool,
}

impl PropertyDefinition {
    pub(crate) fn new(name: String, options: PropertyOptions) -> Self {
        let mut property = Self {
            name,
            aliases: Vec::new(),
            required: true,
            readonly: false,
            default: None,
            coercer: None,
            reader: None,
            after_write: Vec::new(),
            implicit_default: false,
        };
        property.update(options);

        property
    }

    // only supplied fields are overwritten; aliases are declared separately
    pub(crate) fn update(&mut self, options: PropertyOptions) {
        let PropertyOptions {
            aliases: _,
            coercer,
            default,
            required,
            readonly,
            reader,
        } = options;

        if let Some(coercer) = coercer {
            self.coercer = Some(coercer);
        }
        if let Some(default) = default {
            self.default = Some(default);
            self.implicit_default = false;
        }
        if let Some(required) = required {
            self.required = required;
        }
        if let Some(readonly) = readonly {
            self.readonly = readonly;
        }
        if let Some(reader) = reader {
            self.reader = Some(reader);
        }

        if self.readonly && self.default.is_none() {
            self.default = Some(DefaultValue::noop());
            self.implicit_default = true;
        } else if !self.readonly && self.implicit_default {
            self.default = None;
            self.implicit_default = false;
        }
    }

    pub(crate) fn add_alias(&mut self, alias: String) {
        if !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
    }

    pub(crate) fn push_after_write(&mut self, callback: AfterWrite) {
        self.after_write.push(callback);
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn is_readonly(&self) -> bool {
        self.readonly
    }

    #[must_use]
    pub const fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn coercer(&self) -> Option<&Coercer> {
        self.coercer.as_ref()
    }

    #[must_use]
    pub const fn reader(&self) -> Option<&Reader> {
        self.reader.as_ref()
    }

    #[must_use]
    pub fn after_write_callbacks(&self) -> &[AfterWrite] {
        &self.after_write
    }

    /// True when the coercer is the boolean builtin, which also coerces null.
    #[must_use]
    pub fn coerces_as_boolean(&self) -> bool {
        self.coercer.as_ref().is_some_and(Coercer::is_boolean)
    }
}

impl fmt::Debug for PropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("required", &self.required)
            .field("readonly", &self.readonly)
            .field("default", &self.default)
            .field("coercer", &self.coercer)
            .field("reader", &self.reader.is_some())
            .field("after_write", &self.after_write.len())
            .finish()
    }
}

impl PartialEq for PropertyDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PropertyDefinition {}

impl Hash for PropertyDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
