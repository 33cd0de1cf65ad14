//! Record types and trait definitions for the Schemata person/address store.
//!
//! This crate is free of database dependencies. Storage backends implement
//! [`store::RecordStore`]; callers depend on the trait, not a backend.

pub mod error;
pub mod record;
pub mod residency;
pub mod store;

pub use error::{Error, Result};
