//! Error types for `schemata-core`.

use thiserror::Error;

/// Record invariants checked before anything reaches a store. Lookup and
/// foreign-key failures belong to the backend's own error type.
#[derive(Debug, Error)]
pub enum Error {
  #[error("age must be a finite number, got {0}")]
  InvalidAge(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
