//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `schemata-store-sqlite`). The CLI
//! depends on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::record::{Address, AddressId, NewAddress, NewPerson, Person, PersonId};

/// Abstraction over a person/address store backend.
///
/// Keys are assigned by the store. A person's `address_id`, when set, must
/// reference an existing address; backends enforce this and report
/// violations as their own "address not found" error.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Addresses ─────────────────────────────────────────────────────────

  /// Persist a new address and return it with its assigned key.
  fn add_address(
    &self,
    input: NewAddress,
  ) -> impl Future<Output = Result<Address, Self::Error>> + Send + '_;

  /// Retrieve an address by key. Returns `None` if not found.
  fn get_address(
    &self,
    id: AddressId,
  ) -> impl Future<Output = Result<Option<Address>, Self::Error>> + Send + '_;

  /// All addresses, ordered by key.
  fn list_addresses(
    &self,
  ) -> impl Future<Output = Result<Vec<Address>, Self::Error>> + Send + '_;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Persist a new person and return it with its assigned key.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by key. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All persons, ordered by key.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Persons whose foreign key points at `address_id`, ordered by key.
  fn residents(
    &self,
    address_id: AddressId,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Repoint (or clear) a person's address and return the updated record.
  fn move_person(
    &self,
    id: PersonId,
    address_id: Option<AddressId>,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;
}
