//! Shared utilities for pricelens
//!
//! This crate provides common functionality used across the pricelens workspace:
//! tracing subscriber setup and the environment lookups every `from_env`
//! constructor goes through.

pub mod env;
pub mod logging;

pub use env::{EnvError, parse_var, raw_var, require_var, var};
pub use logging::{LogFormat, init_tracing_with};
