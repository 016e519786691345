//! # keel-schema
//!
//! Field descriptors and schema compilation for the Keel ORM.
//!
//! This crate provides:
//! - [`FieldDescriptor`] constructors for the supported column kinds
//! - [`ModelSchema`] compilation into cached select/insert/update/delete templates
//! - [`SchemaCache`] for compiling each model type exactly once
//! - [`Value`] and the typed conversion traits shared by every layer
//!
//! ## Example
//!
//! ```rust
//! use keel_schema::{FieldDescriptor, ModelSchema};
//!
//! let schema = ModelSchema::builder("Blog")
//!     .table("blogs")
//!     .field("id", FieldDescriptor::string().column_type("varchar(50)").primary_key())
//!     .field("title", FieldDescriptor::string())
//!     .field("content", FieldDescriptor::text())
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(schema.sql_delete(), "delete from `blogs` where `id`=?");
//! ```

pub mod cache;
pub mod compiler;
pub mod error;
pub mod field;
pub mod value;

pub use cache::SchemaCache;
pub use compiler::{ModelSchema, SchemaBuilder, placeholders, quote_identifier};
pub use error::{SchemaError, SchemaResult};
pub use field::{FieldDefault, FieldDescriptor, FieldType};
pub use value::{FieldValue, FromValue, Value, ValueError};
