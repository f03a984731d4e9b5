//! Environment-driven configuration.

use std::env;

/// Fallback base URL when `TODO_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:9090/api";

/// Base URL of the todo service, from the `TODO_API_BASE` environment
/// variable with a hard-coded default. Blank values fall back too.
pub fn api_base_url() -> String {
    base_url_or_default(env::var("TODO_API_BASE").ok())
}

fn base_url_or_default(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}
