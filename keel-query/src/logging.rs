//! Logging infrastructure for Keel.
//!
//! Statements are logged through `tracing`. Applications that do not install
//! their own subscriber can call [`init`] to get one driven by environment
//! variables (requires the `tracing-subscriber` feature).
//!
//! # Environment Variables
//!
//! - `KEEL_DEBUG=true` or `KEEL_DEBUG=1` - Enable debug logging
//! - `KEEL_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `KEEL_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use keel_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

use keel_schema::Value;
use tracing::info;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `KEEL_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("KEEL_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `KEEL_LOG_LEVEL`.
///
/// Defaults to "debug" if `KEEL_DEBUG` is enabled, otherwise "info" so that
/// executed statements are visible.
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "info" };
    match env::var("KEEL_LOG_LEVEL") {
        Ok(level) => parse_level(&level).unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Get the configured log format from `KEEL_LOG_FORMAT`. Defaults to "json".
pub fn get_log_format() -> &'static str {
    env::var("KEEL_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the Keel logging system. Subsequent calls are no-ops.
pub fn init() {
    init_with_level(get_log_level());
}

/// Initialize logging at a specific level. Subsequent calls are no-ops.
pub fn init_with_level(level: &str) {
    let level = parse_level(level).unwrap_or("info");

    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(format!(
                "keel={},keel_query={},keel_schema={},keel_mysql={}",
                level, level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("info"));

            let result = match get_log_format() {
                "json" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
                "compact" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
            };

            if result.is_ok() {
                tracing::info!(level = level, format = get_log_format(), "Keel logging initialized");
            }
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            // No subscriber available; logging stays silent unless the
            // application installs its own.
            let _ = level;
        }
    });
}

/// Render statement arguments for the log line.
pub fn render_args(args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

/// Log a statement and its arguments before execution.
pub fn log_statement(sql: &str, args: &[Value]) {
    info!(sql = %sql, args = %render_args(args), "SQL");
}

/// Log the number of rows a query returned.
pub fn log_rows_returned(rows: usize) {
    info!(rows = rows, "rows returned");
}

/// Log the number of rows a statement affected.
pub fn log_rows_affected(affected: u64) {
    info!(affected = affected, "rows affected");
}
