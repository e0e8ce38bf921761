//! Environment variable helpers
//!
//! Configuration types read the process environment only through these
//! functions. Nothing here writes to the environment.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// A required variable is unset or blank
    #[error("{0} environment variable not set")]
    Missing(String),

    /// A variable is set but could not be parsed
    #[error("invalid value '{value}' for {key}: {detail}")]
    Invalid {
        key: String,
        value: String,
        detail: String,
    },
}

/// Read a variable, treating unset and blank values the same
pub fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a variable exactly as set, whitespace included
pub fn raw_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read a variable that must be present
pub fn require_var(key: &str) -> Result<String, EnvError> {
    var(key).ok_or_else(|| EnvError::Missing(key.to_string()))
}

/// Read and parse a variable; `Ok(None)` when it is unset
pub fn parse_var<T>(key: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: Display,
{
    match var(key) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| EnvError::Invalid {
            key: key.to_string(),
            detail: e.to_string(),
            value: raw,
        }),
    }
}
