//! SQLite backend for the Schemata person/address store.
//!
//! The table layout is owned by [`migrations`]: each revision is a pair of
//! plain functions over a [`rusqlite::Connection`]. [`SqliteStore`] wraps
//! [`tokio_rusqlite`] so database access runs on a dedicated thread without
//! blocking the async runtime.

mod rows;
mod store;

pub mod error;
pub mod migrations;

pub use error::{Error, Result};
pub use migrations::{Migration, Migrator};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
