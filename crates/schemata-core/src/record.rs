//! Record types for the person/address data model.
//!
//! Both record kinds carry a surrogate integer key assigned by the store. A
//! person refers to its address through an explicit, nullable foreign key;
//! there is no back-reference stored on [`Address`]. Use
//! [`ResidencyIndex`](crate::residency::ResidencyIndex) for the reverse
//! lookup.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Surrogate key of an [`Address`].
pub type AddressId = i64;

/// Surrogate key of a [`Person`].
pub type PersonId = i64;

// ─── Address ─────────────────────────────────────────────────────────────────

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
  pub id:       AddressId,
  pub street:   String,
  pub city:     String,
  pub postcode: String,
}

impl Address {
  /// Flatten into a plain mapping.
  pub fn to_map(&self) -> Map<String, Value> { flatten(self) }
}

/// Input for [`RecordStore::add_address`](crate::store::RecordStore::add_address).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
  pub street:   String,
  pub city:     String,
  pub postcode: String,
}

impl NewAddress {
  pub fn new(
    street: impl Into<String>,
    city: impl Into<String>,
    postcode: impl Into<String>,
  ) -> Self {
    Self {
      street:   street.into(),
      city:     city.into(),
      postcode: postcode.into(),
    }
  }

  /// Attach the store-assigned key.
  pub fn into_address(self, id: AddressId) -> Address {
    Address {
      id,
      street: self.street,
      city: self.city,
      postcode: self.postcode,
    }
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A person, optionally living at one [`Address`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
  pub id:         PersonId,
  /// Foreign key into the address table; `None` when unhoused.
  #[serde(rename = "address")]
  pub address_id: Option<AddressId>,
  pub name:       String,
  pub age:        f64,
}

impl Person {
  /// Flatten into a plain mapping. The foreign key is exposed as `address`.
  pub fn to_map(&self) -> Map<String, Value> { flatten(self) }
}

/// Input for [`RecordStore::add_person`](crate::store::RecordStore::add_person).
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
  pub address_id: Option<AddressId>,
  pub name:       String,
  pub age:        f64,
}

impl NewPerson {
  /// A person with no address.
  pub fn new(name: impl Into<String>, age: f64) -> Self {
    Self {
      address_id: None,
      name: name.into(),
      age,
    }
  }

  /// Set the address foreign key.
  pub fn at(mut self, address_id: AddressId) -> Self {
    self.address_id = Some(address_id);
    self
  }

  /// Reject values the storage column cannot hold. SQLite stores NaN as
  /// NULL, which would trip the `NOT NULL` constraint with a less useful
  /// message.
  pub fn check(&self) -> Result<()> {
    if !self.age.is_finite() {
      return Err(Error::InvalidAge(self.age));
    }
    Ok(())
  }

  /// Attach the store-assigned key.
  pub fn into_person(self, id: PersonId) -> Person {
    Person {
      id,
      address_id: self.address_id,
      name: self.name,
      age: self.age,
    }
  }
}

/// Records hold only strings and numbers, so they always serialize to an
/// object.
fn flatten(record: &impl Serialize) -> Map<String, Value> {
  match serde_json::to_value(record) {
    Ok(Value::Object(map)) => map,
    _ => Map::new(),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn person_map_exposes_fk_as_address() {
    let person = NewPerson::new("Alice", 31.5).at(7).into_person(1);
    let map = person.to_map();
    assert_eq!(map["id"], json!(1));
    assert_eq!(map["address"], json!(7));
    assert_eq!(map["name"], json!("Alice"));
    assert_eq!(map["age"], json!(31.5));
    assert!(!map.contains_key("address_id"));
    assert_eq!(map.len(), 4);
  }

  #[test]
  fn unhoused_person_maps_address_to_null() {
    let map = NewPerson::new("Bob", 40.0).into_person(2).to_map();
    assert_eq!(map["address"], Value::Null);
  }

  #[test]
  fn address_map_has_all_columns() {
    let map = NewAddress::new("1 Main St", "Springfield", "62701")
      .into_address(3)
      .to_map();
    assert_eq!(
      Value::Object(map),
      json!({ "id": 3, "street": "1 Main St", "city": "Springfield", "postcode": "62701" })
    );
  }

  #[test]
  fn non_finite_age_is_rejected() {
    assert!(matches!(
      NewPerson::new("Eve", f64::NAN).check(),
      Err(Error::InvalidAge(_))
    ));
    assert!(NewPerson::new("Eve", f64::INFINITY).check().is_err());
    assert!(NewPerson::new("Eve", 0.0).check().is_ok());
  }

  #[test]
  fn invalid_age_is_the_only_core_error() {
    let err = NewPerson::new("Eve", f64::NEG_INFINITY).check().unwrap_err();
    match err {
      Error::InvalidAge(age) => assert_eq!(age, f64::NEG_INFINITY),
    }
    assert_eq!(err.to_string(), "age must be a finite number, got -inf");
  }
}
