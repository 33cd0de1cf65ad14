//! Subcommand implementations.

pub mod migrate;
pub mod records;
pub mod validate;
