//! Error type for `schemata-store-sqlite`.

use schemata_core::record::{AddressId, PersonId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] schemata_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A migration target that is not part of the revision chain.
  #[error("unknown revision: {0:?}")]
  UnknownRevision(String),

  /// `PRAGMA user_version` points past the end of the known chain.
  #[error("database is at schema version {0}, which this build does not know")]
  UnknownSchemaVersion(i64),

  #[error("revision {revision} expects parent {expected:?}, found {found:?}")]
  BrokenChain {
    revision: &'static str,
    expected: Option<&'static str>,
    found:    Option<&'static str>,
  },

  /// A person's foreign key pointed at a missing address.
  #[error("address not found: {0}")]
  AddressNotFound(AddressId),

  #[error("person not found: {0}")]
  PersonNotFound(PersonId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
