//! SQL assembly on top of the compiled templates.
//!
//! All generated SQL uses portable `?` placeholders. Executors rewrite them
//! to the driver's native syntax with [`rewrite_placeholders`] right before
//! binding.

use keel_schema::{ModelSchema, Value, quote_identifier};

/// Alias of the single column returned by `find_number`.
pub const NUMBER_ALIAS: &str = "__num__";

/// Placeholder dialect of a database driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseType {
    /// MySQL uses ?, ?, etc.
    #[default]
    MySQL,
    /// SQLite uses ?, ?, etc.
    SQLite,
    /// PostgreSQL uses $1, $2, etc.
    PostgreSQL,
}

impl DatabaseType {
    /// Get the parameter placeholder for this database type (1-based index).
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::PostgreSQL => format!("${}", index),
            Self::MySQL | Self::SQLite => "?".to_string(),
        }
    }
}

/// Rewrite portable `?` placeholders into the driver's native syntax.
///
/// Question marks inside quoted strings and quoted identifiers are left alone.
pub fn rewrite_placeholders(sql: &str, db_type: DatabaseType) -> String {
    if matches!(db_type, DatabaseType::MySQL | DatabaseType::SQLite) {
        return sql.to_string();
    }

    let mut out = String::with_capacity(sql.len() + 8);
    let mut quote: Option<char> = None;
    let mut index = 0;

    for c in sql.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                out.push(c);
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    out.push(c);
                }
                '?' => {
                    index += 1;
                    out.push_str(&db_type.placeholder(index));
                }
                _ => out.push(c),
            },
        }
    }

    out
}

/// Row limit for `find_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// At most `n` rows: `limit ?`.
    Count(u64),
    /// `count` rows after skipping `offset`: `limit ?,?`.
    Range { offset: u64, count: u64 },
}

impl From<u64> for Limit {
    fn from(count: u64) -> Self {
        Self::Count(count)
    }
}

impl From<(u64, u64)> for Limit {
    fn from((offset, count): (u64, u64)) -> Self {
        Self::Range { offset, count }
    }
}

/// Options for `find_all`.
///
/// The predicate and ordering are raw SQL fragments appended to the compiled
/// select template; `args` bind the predicate's placeholders.
///
/// ```rust
/// use keel_query::FindOptions;
///
/// let opts = FindOptions::new()
///     .filter("`user_id`=?", ["u-001"])
///     .order_by("`created_at` desc")
///     .limit((10u64, 5u64));
/// assert_eq!(opts.args.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Raw predicate, without the `where` keyword.
    pub where_: Option<String>,
    /// Arguments for the predicate's placeholders.
    pub args: Vec<Value>,
    /// Raw ordering, without `order by`.
    pub order_by: Option<String>,
    /// Row limit.
    pub limit: Option<Limit>,
}

impl FindOptions {
    /// No predicate, ordering, or limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the predicate and its arguments.
    pub fn filter<I, V>(mut self, predicate: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_ = Some(predicate.into());
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ordering.
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Set the limit: a count or an `(offset, count)` pair.
    pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

/// `select ... where pk=?`.
pub fn find_by_key(schema: &ModelSchema) -> String {
    format!(
        "{} where {}=?",
        schema.sql_select(),
        quote_identifier(schema.primary_key_column())
    )
}

/// The compiled select plus the optional predicate, ordering, and limit.
pub fn find_all(schema: &ModelSchema, options: &FindOptions) -> (String, Vec<Value>) {
    let mut parts = vec![schema.sql_select().to_string()];
    let mut args = options.args.clone();

    if let Some(ref predicate) = options.where_ {
        parts.push("where".to_string());
        parts.push(predicate.clone());
    }

    if let Some(ref order_by) = options.order_by {
        parts.push("order by".to_string());
        parts.push(order_by.clone());
    }

    match options.limit {
        Some(Limit::Count(count)) => {
            parts.push("limit ?".to_string());
            args.push(Value::Int(clamp(count)));
        }
        Some(Limit::Range { offset, count }) => {
            parts.push("limit ?,?".to_string());
            args.push(Value::Int(clamp(offset)));
            args.push(Value::Int(clamp(count)));
        }
        None => {}
    }

    (parts.join(" "), args)
}

/// `select <expr> as __num__ from table [where <predicate>]`.
pub fn find_number(schema: &ModelSchema, select_expr: &str, predicate: Option<&str>) -> String {
    let mut sql = format!(
        "select {} as {} from {}",
        select_expr,
        quote_identifier(NUMBER_ALIAS),
        quote_identifier(schema.table_name())
    );
    if let Some(predicate) = predicate {
        sql.push_str(" where ");
        sql.push_str(predicate);
    }
    sql
}

fn clamp(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_schema::FieldDescriptor;
    use pretty_assertions::assert_eq;

    fn blog() -> ModelSchema {
        ModelSchema::builder("Blog")
            .table("blogs")
            .field("id", FieldDescriptor::string().primary_key())
            .field("title", FieldDescriptor::string())
            .compile()
            .unwrap()
    }

    #[test]
    fn test_placeholder_styles() {
        assert_eq!(DatabaseType::PostgreSQL.placeholder(1), "$1");
        assert_eq!(DatabaseType::MySQL.placeholder(3), "?");
    }

    #[test]
    fn test_rewrite_mysql_is_identity() {
        let sql = "select `id` from `t` where `id`=?";
        assert_eq!(rewrite_placeholders(sql, DatabaseType::MySQL), sql);
    }

    #[test]
    fn test_rewrite_postgres_skips_quoted() {
        let sql = "select `a?` from t where x=? and y='?' and z=?";
        assert_eq!(
            rewrite_placeholders(sql, DatabaseType::PostgreSQL),
            "select `a?` from t where x=$1 and y='?' and z=$2"
        );
    }

    #[test]
    fn test_find_by_key() {
        assert_eq!(
            find_by_key(&blog()),
            "select `id`, `title` from `blogs` where `id`=?"
        );
    }

    #[test]
    fn test_find_all_no_options() {
        let (sql, args) = find_all(&blog(), &FindOptions::new());
        assert_eq!(sql, "select `id`, `title` from `blogs`");
        assert!(args.is_empty());
    }

    #[test]
    fn test_find_all_full() {
        let opts = FindOptions::new()
            .filter("`title` like ?", ["%rust%"])
            .order_by("`title` desc")
            .limit((20u64, 10u64));
        let (sql, args) = find_all(&blog(), &opts);

        assert_eq!(
            sql,
            "select `id`, `title` from `blogs` where `title` like ? order by `title` desc limit ?,?"
        );
        assert_eq!(
            args,
            vec![Value::from("%rust%"), Value::Int(20), Value::Int(10)]
        );
    }

    #[test]
    fn test_find_all_count_limit() {
        let (sql, args) = find_all(&blog(), &FindOptions::new().limit(5u64));
        assert!(sql.ends_with("limit ?"));
        assert_eq!(args, vec![Value::Int(5)]);
    }

    #[test]
    fn test_find_number() {
        assert_eq!(
            find_number(&blog(), "count(id)", None),
            "select count(id) as `__num__` from `blogs`"
        );
        assert_eq!(
            find_number(&blog(), "max(`id`)", Some("`title`=?")),
            "select max(`id`) as `__num__` from `blogs` where `title`=?"
        );
    }
}
