//! Field descriptors: the column metadata of one mapped attribute.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Semantic kind of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Short string, `varchar(100)` unless overridden.
    String,
    /// Boolean flag.
    Boolean,
    /// 64-bit integer.
    Integer,
    /// Floating point number.
    Float,
    /// Long text.
    Text,
}

impl FieldType {
    /// Column type used when none is given.
    pub fn default_column_type(&self) -> &'static str {
        match self {
            Self::String => "varchar(100)",
            Self::Boolean => "boolean",
            Self::Integer => "bigint",
            Self::Float => "real",
            Self::Text => "Text",
        }
    }

    /// Whether a field of this kind may be the primary key.
    pub fn can_be_primary_key(&self) -> bool {
        matches!(self, Self::String | Self::Integer | Self::Float)
    }

    /// Descriptor kind name, as shown in the display form.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String => "StringField",
            Self::Boolean => "BooleanField",
            Self::Integer => "IntegerField",
            Self::Float => "FloatField",
            Self::Text => "TextField",
        }
    }

    fn default_default(&self) -> Option<FieldDefault> {
        match self {
            Self::Integer => Some(FieldDefault::Value(Value::Int(0))),
            Self::Float => Some(FieldDefault::Value(Value::Float(0.0))),
            Self::String | Self::Boolean | Self::Text => None,
        }
    }
}

/// Default used by `save` when a field is unset.
#[derive(Clone)]
pub enum FieldDefault {
    /// A fixed value.
    Value(Value),
    /// A generator invoked each time a default is needed.
    Generator(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl FieldDefault {
    /// Create a generator default.
    pub fn generator(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Generator(Arc::new(f))
    }

    /// Produce the default value, invoking the generator if there is one.
    pub fn resolve(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Generator(f) => f(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// Describes one mapped column.
///
/// Descriptors are built with the per-kind constructors and refined with the
/// builder methods; they are immutable once handed to the schema builder.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: Option<String>,
    field_type: FieldType,
    column_type: String,
    primary_key: bool,
    default: Option<FieldDefault>,
}

impl FieldDescriptor {
    /// Create a descriptor of the given kind with its standard column type and default.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            name: None,
            field_type,
            column_type: field_type.default_column_type().to_string(),
            primary_key: false,
            default: field_type.default_default(),
        }
    }

    /// A `varchar(100)` column.
    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    /// A `boolean` column.
    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    /// A `bigint` column defaulting to `0`.
    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    /// A `real` column defaulting to `0.0`.
    pub fn float() -> Self {
        Self::new(FieldType::Float)
    }

    /// A `Text` column.
    pub fn text() -> Self {
        Self::new(FieldType::Text)
    }

    /// Set the column name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the column type.
    pub fn column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    /// Mark as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Set a fixed default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(FieldDefault::Value(value.into()));
        self
    }

    /// Set a default generator, invoked on every save that needs it.
    pub fn default_with(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(FieldDefault::generator(f));
        self
    }

    /// Remove any default, including the kind's standard one.
    pub fn no_default(mut self) -> Self {
        self.default = None;
        self
    }

    /// The column name, if set.
    pub fn column_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The field kind.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// The column type string.
    pub fn sql_type(&self) -> &str {
        &self.column_type
    }

    /// Whether this is the primary key.
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// The declared default.
    pub fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    pub(crate) fn fill_name(&mut self, attribute: &str) {
        if self.name.is_none() {
            self.name = Some(attribute.to_string());
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}, {}: {}>",
            self.field_type.kind_name(),
            self.column_type,
            self.name.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_column_types() {
        assert_eq!(FieldDescriptor::string().sql_type(), "varchar(100)");
        assert_eq!(FieldDescriptor::boolean().sql_type(), "boolean");
        assert_eq!(FieldDescriptor::integer().sql_type(), "bigint");
        assert_eq!(FieldDescriptor::float().sql_type(), "real");
        assert_eq!(FieldDescriptor::text().sql_type(), "Text");
    }

    #[test]
    fn test_default_defaults() {
        let int = FieldDescriptor::integer();
        assert_eq!(int.default().map(FieldDefault::resolve), Some(Value::Int(0)));

        let float = FieldDescriptor::float();
        assert_eq!(
            float.default().map(FieldDefault::resolve),
            Some(Value::Float(0.0))
        );

        assert!(FieldDescriptor::string().default().is_none());
        assert!(FieldDescriptor::text().default().is_none());
        assert!(FieldDescriptor::integer().no_default().default().is_none());
    }

    #[test]
    fn test_generator_default_invoked_each_time() {
        use std::sync::atomic::{AtomicI64, Ordering};

        let counter = Arc::new(AtomicI64::new(0));
        let c = Arc::clone(&counter);
        let field =
            FieldDescriptor::integer().default_with(move || Value::Int(c.fetch_add(1, Ordering::SeqCst)));

        let default = field.default().unwrap();
        assert_eq!(default.resolve(), Value::Int(0));
        assert_eq!(default.resolve(), Value::Int(1));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_display() {
        let field = FieldDescriptor::integer().name("id").primary_key();
        assert_eq!(field.to_string(), "<IntegerField, bigint: id>");

        let custom = FieldDescriptor::string().column_type("varchar(50)").name("email");
        assert_eq!(custom.to_string(), "<StringField, varchar(50): email>");
    }

    #[test]
    fn test_fill_name_keeps_explicit() {
        let mut named = FieldDescriptor::string().name("username");
        named.fill_name("name");
        assert_eq!(named.column_name(), Some("username"));

        let mut unnamed = FieldDescriptor::string();
        unnamed.fill_name("name");
        assert_eq!(unnamed.column_name(), Some("name"));
    }
}
