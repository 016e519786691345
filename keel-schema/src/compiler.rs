//! Schema compilation: from declared fields to pre-rendered SQL templates.
//!
//! A model declares an ordered list of `(attribute, FieldDescriptor)` pairs.
//! Compiling it partitions the fields into exactly one primary key and the
//! ordered non-key fields, then renders the four statement templates with
//! backtick-quoted identifiers and portable `?` placeholders:
//!
//! ```rust
//! use keel_schema::{FieldDescriptor, ModelSchema};
//!
//! let schema = ModelSchema::builder("User")
//!     .field("id", FieldDescriptor::integer().primary_key())
//!     .field("name", FieldDescriptor::string())
//!     .field("email", FieldDescriptor::string())
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(schema.sql_select(), "select `id`, `name`, `email` from `User`");
//! assert_eq!(
//!     schema.sql_insert(),
//!     "insert into `User` (`name`, `email`, `id`) values(?,?,?)"
//! );
//! ```
//!
//! Compilation is pure: the same declarations always produce the same text.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::info;

use crate::error::{SchemaError, SchemaResult};
use crate::field::FieldDescriptor;

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Render `n` comma-separated `?` placeholders.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// Collects a model's field declarations before compilation.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    model: String,
    table: Option<String>,
    fields: Vec<(String, FieldDescriptor)>,
}

impl SchemaBuilder {
    /// Start declaring a model. The table name defaults to the model name.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    /// Map the model to an explicit table name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Declare a field. Declaration order is significant.
    pub fn field(mut self, attribute: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.push((attribute.into(), descriptor));
        self
    }

    /// Compile the declarations into a schema.
    pub fn compile(self) -> SchemaResult<ModelSchema> {
        let table = self.table.unwrap_or_else(|| self.model.clone());
        info!(model = %self.model, table = %table, "found model");

        let mut mappings: IndexMap<String, FieldDescriptor> = IndexMap::with_capacity(self.fields.len());
        let mut columns_seen: HashMap<String, String> = HashMap::with_capacity(self.fields.len());
        let mut primary_key: Option<String> = None;
        let mut fields = Vec::with_capacity(self.fields.len());

        for (attribute, mut descriptor) in self.fields {
            if mappings.contains_key(&attribute) {
                return Err(SchemaError::DuplicateField {
                    model: self.model,
                    field: attribute,
                });
            }

            descriptor.fill_name(&attribute);
            info!(model = %self.model, field = %attribute, mapping = %descriptor, "found mapping");

            let column = descriptor.column_name().unwrap_or(attribute.as_str()).to_string();
            if let Some(first) = columns_seen.get(&column) {
                return Err(SchemaError::DuplicateColumn {
                    model: self.model,
                    column,
                    first: first.clone(),
                    second: attribute,
                });
            }
            columns_seen.insert(column, attribute.clone());

            if descriptor.is_primary_key() {
                if !descriptor.field_type().can_be_primary_key() {
                    return Err(SchemaError::InvalidPrimaryKey {
                        model: self.model,
                        field: attribute,
                        kind: descriptor.field_type().kind_name(),
                    });
                }
                if let Some(first) = primary_key {
                    return Err(SchemaError::duplicate_primary_key(self.model, first, attribute));
                }
                primary_key = Some(attribute.clone());
            } else {
                fields.push(attribute.clone());
            }

            mappings.insert(attribute, descriptor);
        }

        let primary_key = primary_key.ok_or_else(|| SchemaError::missing_primary_key(&self.model))?;

        let column = |attribute: &str| {
            let name = mappings
                .get(attribute)
                .and_then(FieldDescriptor::column_name)
                .unwrap_or(attribute);
            quote_identifier(name)
        };

        let quoted_table = quote_identifier(&table);
        let pk_column = column(primary_key.as_str());
        let columns: Vec<String> = fields.iter().map(|f| column(f.as_str())).collect();

        let sql_select = if columns.is_empty() {
            format!("select {} from {}", pk_column, quoted_table)
        } else {
            format!("select {}, {} from {}", pk_column, columns.join(", "), quoted_table)
        };

        let sql_insert = if columns.is_empty() {
            format!("insert into {} ({}) values({})", quoted_table, pk_column, placeholders(1))
        } else {
            format!(
                "insert into {} ({}, {}) values({})",
                quoted_table,
                columns.join(", "),
                pk_column,
                placeholders(columns.len() + 1)
            )
        };

        let assignments: Vec<String> = columns.iter().map(|c| format!("{}=?", c)).collect();
        let sql_update = format!(
            "update {} set {} where {}=?",
            quoted_table,
            assignments.join(", "),
            pk_column
        );

        let sql_delete = format!("delete from {} where {}=?", quoted_table, pk_column);

        Ok(ModelSchema {
            model: self.model,
            table,
            primary_key,
            fields,
            mappings,
            sql_select,
            sql_insert,
            sql_update,
            sql_delete,
        })
    }
}

/// A compiled model schema.
///
/// Field order is fixed for the schema's lifetime since the SQL templates
/// bind arguments positionally.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    model: String,
    table: String,
    primary_key: String,
    fields: Vec<String>,
    mappings: IndexMap<String, FieldDescriptor>,
    sql_select: String,
    sql_insert: String,
    sql_update: String,
    sql_delete: String,
}

impl ModelSchema {
    /// Start declaring a model.
    pub fn builder(model: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(model)
    }

    /// The model (type) name.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// The table name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// The primary key attribute.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Non-key attributes in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// All descriptors in declaration order, keyed by attribute.
    pub fn mappings(&self) -> &IndexMap<String, FieldDescriptor> {
        &self.mappings
    }

    /// Look up the descriptor of an attribute.
    pub fn field(&self, attribute: &str) -> Option<&FieldDescriptor> {
        self.mappings.get(attribute)
    }

    /// Column name of an attribute.
    pub fn column(&self, attribute: &str) -> Option<&str> {
        self.mappings.get(attribute).and_then(FieldDescriptor::column_name)
    }

    /// Column name of the primary key.
    pub fn primary_key_column(&self) -> &str {
        self.column(&self.primary_key).unwrap_or(&self.primary_key)
    }

    /// Attributes in insert-binding order: non-key fields, then the primary key.
    pub fn insert_order(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.primary_key.as_str()))
    }

    /// `select pk, fields... from table`, without a predicate.
    pub fn sql_select(&self) -> &str {
        &self.sql_select
    }

    /// `insert into table (fields..., pk) values(?,...)`.
    pub fn sql_insert(&self) -> &str {
        &self.sql_insert
    }

    /// `update table set field=?,... where pk=?`.
    pub fn sql_update(&self) -> &str {
        &self.sql_update
    }

    /// `delete from table where pk=?`.
    pub fn sql_delete(&self) -> &str {
        &self.sql_delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user() -> SchemaBuilder {
        ModelSchema::builder("User")
            .field("id", FieldDescriptor::integer().primary_key())
            .field("name", FieldDescriptor::string())
            .field("email", FieldDescriptor::string())
    }

    #[test]
    fn test_compile_user_templates() {
        let schema = user().compile().unwrap();

        assert_eq!(schema.table_name(), "User");
        assert_eq!(schema.primary_key(), "id");
        assert_eq!(schema.fields(), &["name".to_string(), "email".to_string()]);
        assert_eq!(schema.sql_select(), "select `id`, `name`, `email` from `User`");
        assert_eq!(
            schema.sql_insert(),
            "insert into `User` (`name`, `email`, `id`) values(?,?,?)"
        );
        assert_eq!(
            schema.sql_update(),
            "update `User` set `name`=?, `email`=? where `id`=?"
        );
        assert_eq!(schema.sql_delete(), "delete from `User` where `id`=?");
    }

    #[test]
    fn test_explicit_table_name() {
        let schema = user().table("users").compile().unwrap();
        assert_eq!(schema.model_name(), "User");
        assert_eq!(schema.sql_delete(), "delete from `users` where `id`=?");
    }

    #[test]
    fn test_column_name_override() {
        let schema = ModelSchema::builder("User")
            .field("id", FieldDescriptor::integer().primary_key())
            .field("name", FieldDescriptor::string().name("username"))
            .compile()
            .unwrap();

        assert_eq!(schema.column("name"), Some("username"));
        assert_eq!(schema.sql_select(), "select `id`, `username` from `User`");
        assert_eq!(
            schema.sql_update(),
            "update `User` set `username`=? where `id`=?"
        );
    }

    #[test]
    fn test_placeholder_count_matches_columns() {
        for n in 0..6 {
            let mut builder =
                ModelSchema::builder("Wide").field("pk", FieldDescriptor::string().primary_key());
            for i in 0..n {
                builder = builder.field(format!("f{}", i), FieldDescriptor::integer());
            }
            let schema = builder.compile().unwrap();

            assert_eq!(schema.sql_insert().matches('?').count(), n + 1);
            assert_eq!(schema.sql_select().matches('`').count(), 2 * (n + 2));
            assert!(schema.sql_select().starts_with("select `pk`"));
        }
    }

    #[test]
    fn test_primary_key_only_model() {
        let schema = ModelSchema::builder("Tag")
            .field("label", FieldDescriptor::string().primary_key())
            .compile()
            .unwrap();

        assert_eq!(schema.sql_select(), "select `label` from `Tag`");
        assert_eq!(schema.sql_insert(), "insert into `Tag` (`label`) values(?)");
        assert!(schema.fields().is_empty());
    }

    #[test]
    fn test_missing_primary_key() {
        let err = ModelSchema::builder("Blog")
            .field("title", FieldDescriptor::string())
            .compile()
            .unwrap_err();
        assert_eq!(err, SchemaError::missing_primary_key("Blog"));
    }

    #[test]
    fn test_duplicate_primary_key() {
        let err = ModelSchema::builder("Blog")
            .field("id", FieldDescriptor::integer().primary_key())
            .field("slug", FieldDescriptor::string().primary_key())
            .compile()
            .unwrap_err();
        assert_eq!(err, SchemaError::duplicate_primary_key("Blog", "id", "slug"));
    }

    #[test]
    fn test_duplicate_field() {
        let err = user()
            .field("email", FieldDescriptor::text())
            .compile()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { ref field, .. } if field == "email"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = ModelSchema::builder("Post")
            .field("id", FieldDescriptor::integer().primary_key())
            .field("a", FieldDescriptor::string().name("x"))
            .field("b", FieldDescriptor::string().name("x"))
            .compile()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateColumn {
                model: "Post".into(),
                column: "x".into(),
                first: "a".into(),
                second: "b".into(),
            }
        );

        // A column override may not collide with another attribute's default column either.
        let err = ModelSchema::builder("Post")
            .field("id", FieldDescriptor::integer().primary_key())
            .field("title", FieldDescriptor::string())
            .field("heading", FieldDescriptor::string().name("title"))
            .compile()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { ref column, .. } if column == "title"));
    }

    #[test]
    fn test_boolean_primary_key_rejected() {
        let err = ModelSchema::builder("Flag")
            .field("on", FieldDescriptor::boolean().primary_key())
            .compile()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPrimaryKey { kind: "BooleanField", .. }));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let a = user().compile().unwrap();
        let b = user().compile().unwrap();
        assert_eq!(a.sql_select(), b.sql_select());
        assert_eq!(a.sql_insert(), b.sql_insert());
        assert_eq!(a.sql_update(), b.sql_update());
        assert_eq!(a.sql_delete(), b.sql_delete());
        assert_eq!(
            a.insert_order().collect::<Vec<_>>(),
            vec!["name", "email", "id"]
        );
    }

    #[test]
    fn test_mappings_display() {
        let schema = user().compile().unwrap();
        let rendered: Vec<String> = schema.mappings().values().map(ToString::to_string).collect();

        insta::assert_snapshot!(rendered.join("\n"), @r"
        <IntegerField, bigint: id>
        <StringField, varchar(100): name>
        <StringField, varchar(100): email>
        ");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("user"), "`user`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(placeholders(3), "?,?,?");
        assert_eq!(placeholders(0), "");
    }
}
