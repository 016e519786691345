//! Error types for schema compilation.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while compiling a model schema.
///
/// These are fatal to the model type and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SchemaError {
    /// More than one field is marked as primary key.
    #[error("duplicate primary key for model `{model}`: `{first}` and `{second}`")]
    #[diagnostic(
        code(keel::schema::duplicate_primary_key),
        help("mark exactly one field as the primary key")
    )]
    DuplicatePrimaryKey {
        model: String,
        first: String,
        second: String,
    },

    /// No field is marked as primary key.
    #[error("primary key not found for model `{model}`")]
    #[diagnostic(
        code(keel::schema::missing_primary_key),
        help("mark one field as the primary key")
    )]
    MissingPrimaryKey { model: String },

    /// The same attribute was declared twice.
    #[error("duplicate field `{model}.{field}`")]
    #[diagnostic(code(keel::schema::duplicate_field))]
    DuplicateField { model: String, field: String },

    /// Two attributes map to the same column.
    #[error("fields `{model}.{first}` and `{model}.{second}` both map to column `{column}`")]
    #[diagnostic(
        code(keel::schema::duplicate_column),
        help("give one of the fields a distinct column name")
    )]
    DuplicateColumn {
        model: String,
        column: String,
        first: String,
        second: String,
    },

    /// A field kind that cannot carry the primary key was marked as one.
    #[error("field `{model}.{field}` of kind {kind} cannot be a primary key")]
    #[diagnostic(code(keel::schema::invalid_primary_key))]
    InvalidPrimaryKey {
        model: String,
        field: String,
        kind: &'static str,
    },
}

impl SchemaError {
    /// Create a missing primary key error.
    pub fn missing_primary_key(model: impl Into<String>) -> Self {
        Self::MissingPrimaryKey {
            model: model.into(),
        }
    }

    /// Create a duplicate primary key error.
    pub fn duplicate_primary_key(
        model: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicatePrimaryKey {
            model: model.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Check if this is a primary key cardinality error.
    pub fn is_primary_key_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePrimaryKey { .. } | Self::MissingPrimaryKey { .. }
        )
    }
}
