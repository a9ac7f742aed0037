//! Utility functions and helpers.
//!
//! Environment variable handling shared by the configuration builder.

pub mod env;

pub use env::get_env_with_prefix;

