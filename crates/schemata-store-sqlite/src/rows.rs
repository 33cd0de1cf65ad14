//! Row mapping between SQLite result rows and record types.
//!
//! Keys are native `INTEGER` rowids, ages are `REAL`; no text encoding is
//! involved.

use schemata_core::record::{Address, AddressId, Person};

use crate::Error;

pub const ADDRESS_COLUMNS: &str = "id, street, city, postcode";

pub const PERSON_COLUMNS: &str = "id, address_id, name, age";

pub fn address_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Address> {
  Ok(Address {
    id:       row.get(0)?,
    street:   row.get(1)?,
    city:     row.get(2)?,
    postcode: row.get(3)?,
  })
}

pub fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:         row.get(0)?,
    address_id: row.get(1)?,
    name:       row.get(2)?,
    age:        row.get(3)?,
  })
}

/// True if `err` is SQLite refusing a row because of a foreign key.
pub fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
  )
}

/// Translate a failed person write. A foreign-key violation can only come
/// from `address_id`, so it is reported against that key.
pub fn person_write_error(err: rusqlite::Error, address_id: Option<AddressId>) -> Error {
  match address_id {
    Some(id) if is_foreign_key_violation(&err) => Error::AddressNotFound(id),
    _ => Error::Sqlite(err),
  }
}
