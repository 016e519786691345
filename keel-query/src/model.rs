//! The model contract and its persistence operations.
//!
//! A model is a typed record whose schema is declared once through
//! [`Model::define`] and compiled on first use. The generic operations only
//! ever touch fields through the name-based accessors, in the schema's fixed
//! field order, so the compiled templates can bind arguments positionally.
//!
//! ```rust,ignore
//! #[derive(keel::Model)]
//! struct User {
//!     #[keel(primary_key)]
//!     id: i64,
//!     name: Option<String>,
//!     email: Option<String>,
//! }
//!
//! let mut user = User { id: 1, name: Some("ann".into()), email: None };
//! user.save(&pool).await?;
//! let found = User::find(&pool, 1).await?;
//! ```
//!
//! `save`, `update`, and `remove` never fail on an unexpected affected-row
//! count: they log a warning and return the count. Statement failures always
//! propagate.

use std::sync::Arc;

use async_trait::async_trait;
use keel_schema::{ModelSchema, SchemaBuilder, SchemaCache, SchemaResult, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::executor::Executor;
use crate::row::{Row, RowError};
use crate::sql::{self, FindOptions, NUMBER_ALIAS};

/// A record type mapped to one table.
#[async_trait]
pub trait Model: Sized + Send + Sync + 'static {
    /// Declare the model's table and fields.
    fn define() -> SchemaBuilder;

    /// Current value of a field by attribute name; `None` if unset or unknown.
    fn get_value(&self, field: &str) -> Option<Value>;

    /// Assign a field by attribute name.
    fn set_value(&mut self, field: &str, value: Value) -> std::result::Result<(), RowError>;

    /// Materialize a record from a result row keyed by column name.
    fn from_row(row: &Row) -> std::result::Result<Self, RowError>;

    /// The compiled schema, compiled once per type and cached for the process.
    fn schema() -> SchemaResult<Arc<ModelSchema>> {
        SchemaCache::global().get_or_compile::<Self>(|| Self::define().compile())
    }

    /// Current value of `field`, falling back to its declared default.
    ///
    /// A resolved default is written back into the record. Unset fields
    /// without a default resolve to `NULL`.
    fn value_or_default(&mut self, schema: &ModelSchema, field: &str) -> Result<Value> {
        if let Some(value) = self.get_value(field) {
            return Ok(value);
        }

        match schema.field(field).and_then(|f| f.default()) {
            Some(default) => {
                let value = default.resolve();
                debug!(field = %field, value = %value, "using default value");
                self.set_value(field, value.clone())?;
                Ok(value)
            }
            None => Ok(Value::Null),
        }
    }

    /// Find a record by primary key. Returns `None` when no row matches.
    async fn find<E, K>(db: &E, primary_key: K) -> Result<Option<Self>>
    where
        E: Executor + ?Sized,
        K: Into<Value> + Send,
    {
        let schema = Self::schema()?;
        let sql = sql::find_by_key(&schema);
        let rows = db.select(&sql, &[primary_key.into()], Some(1)).await?;

        Ok(rows.first().map(Self::from_row).transpose()?)
    }

    /// Find all records matching the options, in the order rows are returned.
    async fn find_all<E>(db: &E, options: FindOptions) -> Result<Vec<Self>>
    where
        E: Executor + ?Sized,
    {
        let schema = Self::schema()?;
        let (sql, args) = sql::find_all(&schema, &options);
        let rows = db.select(&sql, &args, None).await?;

        Ok(rows
            .iter()
            .map(Self::from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Run a one-off aggregate such as `count(id)` over the table.
    ///
    /// Returns `None` when no row comes back or the aggregate is `NULL`.
    async fn find_number<E>(
        db: &E,
        select_expr: &str,
        predicate: Option<&str>,
        args: &[Value],
    ) -> Result<Option<Value>>
    where
        E: Executor + ?Sized,
    {
        let schema = Self::schema()?;
        let sql = sql::find_number(&schema, select_expr, predicate);
        let rows = db.select(&sql, args, Some(1)).await?;

        Ok(rows
            .first()
            .and_then(|row| row.value(NUMBER_ALIAS).or_else(|| row.first()))
            .filter(|v| !v.is_null())
            .cloned())
    }

    /// Insert this record, filling unset fields from their defaults.
    ///
    /// Returns the affected row count; a count other than 1 is logged, not raised.
    async fn save<E>(&mut self, db: &E) -> Result<u64>
    where
        E: Executor + ?Sized,
    {
        let schema = Self::schema()?;
        let mut args = Vec::with_capacity(schema.fields().len() + 1);
        for field in schema.insert_order() {
            args.push(self.value_or_default(&schema, field)?);
        }

        let affected = db.execute(schema.sql_insert(), &args).await?;
        if affected != 1 {
            warn!(
                model = %schema.model_name(),
                affected = affected,
                "failed to insert record"
            );
        }
        Ok(affected)
    }

    /// Update every non-key column by primary key, using current values only.
    ///
    /// Unset fields are written as `NULL`; defaults are never applied here.
    async fn update<E>(&self, db: &E) -> Result<u64>
    where
        E: Executor + ?Sized,
    {
        let schema = Self::schema()?;
        if schema.fields().is_empty() {
            warn!(model = %schema.model_name(), "nothing to update: model has no non-key fields");
            return Ok(0);
        }

        let args: Vec<Value> = schema
            .insert_order()
            .map(|field| self.get_value(field).unwrap_or(Value::Null))
            .collect();

        let affected = db.execute(schema.sql_update(), &args).await?;
        if affected != 1 {
            warn!(
                model = %schema.model_name(),
                affected = affected,
                "failed to update by primary key"
            );
        }
        Ok(affected)
    }

    /// Delete this record by primary key.
    async fn remove<E>(&self, db: &E) -> Result<u64>
    where
        E: Executor + ?Sized,
    {
        let schema = Self::schema()?;
        let args = [self.get_value(schema.primary_key()).unwrap_or(Value::Null)];

        let affected = db.execute(schema.sql_delete(), &args).await?;
        if affected != 1 {
            warn!(
                model = %schema.model_name(),
                affected = affected,
                "failed to remove by primary key"
            );
        }
        Ok(affected)
    }
}
