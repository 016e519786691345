//! Procedural macros for the Keel ORM.
//!
//! The [`Model`] derive declares a struct's schema and generates the
//! name-based field accessors the model operations use.
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(keel::Model)]
//! #[keel(table = "users")]
//! struct User {
//!     #[keel(primary_key)]
//!     id: i64,
//!     name: Option<String>,
//!     #[keel(column = "mail", column_type = "varchar(255)")]
//!     email: Option<String>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod derive;

/// Derive macro for Keel models.
///
/// # Attributes
///
/// ## Struct-level
/// - `#[keel(table = "table_name")]` - Map to a table other than the type name
///
/// ## Field-level
/// - `#[keel(primary_key)]` (or `id`) - Mark the primary key; exactly one is required
/// - `#[keel(column = "col_name")]` - Map to a different column
/// - `#[keel(column_type = "varchar(50)")]` - Override the column type
/// - `#[keel(text)]` or `#[keel(kind = "...")]` - Choose the column kind
///   (`string`, `boolean`, `integer`, `float`, `text`); otherwise inferred from
///   `String`, `bool`, `i32`/`i64`/`u32`, `f32`/`f64`, optionally wrapped in `Option`
/// - `#[keel(default = expr)]` - Default used by `save` when the field is unset
/// - `#[keel(default_fn = path)]` - Function called for a fresh default on each `save`
/// - `#[keel(no_default)]` - Drop the kind's standard default
/// - `#[keel(skip)]` - Leave the field unmapped; filled with `Default::default()` on load
///
/// Only `Option<T>` fields can be unset; other fields always report their value.
#[proc_macro_derive(Model, attributes(keel))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive::derive_model_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
