//! Explicit person ↔ address lookup.
//!
//! Persons hold the foreign key; this index is the reverse direction, built
//! eagerly from a slice of persons. It never reaches back into a store.

use std::collections::HashMap;

use crate::record::{AddressId, Person, PersonId};

/// Reverse index from addresses to the persons living there.
#[derive(Debug, Clone, Default)]
pub struct ResidencyIndex {
  by_address: HashMap<AddressId, Vec<PersonId>>,
  by_person:  HashMap<PersonId, AddressId>,
  unhoused:   Vec<PersonId>,
}

impl ResidencyIndex {
  /// Index `persons`. Resident lists keep the input order.
  pub fn build(persons: &[Person]) -> Self {
    let mut index = Self::default();
    for person in persons {
      match person.address_id {
        Some(address_id) => {
          index.by_address.entry(address_id).or_default().push(person.id);
          index.by_person.insert(person.id, address_id);
        }
        None => index.unhoused.push(person.id),
      }
    }
    index
  }

  /// Persons whose foreign key points at `address_id`.
  pub fn residents(&self, address_id: AddressId) -> &[PersonId] {
    self
      .by_address
      .get(&address_id)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// The address of `person_id`, if indexed and housed.
  pub fn address_of(&self, person_id: PersonId) -> Option<AddressId> {
    self.by_person.get(&person_id).copied()
  }

  /// Persons with a null foreign key.
  pub fn unhoused(&self) -> &[PersonId] { &self.unhoused }
}
