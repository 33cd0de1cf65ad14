//! Integration tests for `SqliteStore` against in-memory and on-disk
//! databases.

use schemata_core::{
  record::{NewAddress, NewPerson},
  residency::ResidencyIndex,
  store::RecordStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn springfield() -> NewAddress {
  NewAddress::new("742 Evergreen Terrace", "Springfield", "49007")
}

// ─── Addresses ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_address() {
  let s = store().await;

  let address = s.add_address(springfield()).await.unwrap();
  assert_eq!(address.city, "Springfield");

  let fetched = s.get_address(address.id).await.unwrap().unwrap();
  assert_eq!(fetched, address);
}

#[tokio::test]
async fn get_address_missing_returns_none() {
  let s = store().await;
  assert!(s.get_address(404).await.unwrap().is_none());
}

#[tokio::test]
async fn surrogate_keys_are_assigned_in_order() {
  let s = store().await;
  let a = s.add_address(springfield()).await.unwrap();
  let b = s
    .add_address(NewAddress::new("1 Infinite Loop", "Cupertino", "95014"))
    .await
    .unwrap();
  assert!(b.id > a.id);

  let all = s.list_addresses().await.unwrap();
  assert_eq!(all.iter().map(|a| a.id).collect::<Vec<_>>(), [a.id, b.id]);
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_person_without_address() {
  let s = store().await;
  let person = s.add_person(NewPerson::new("Maggie", 1.5)).await.unwrap();
  assert_eq!(person.address_id, None);

  let fetched = s.get_person(person.id).await.unwrap().unwrap();
  assert_eq!(fetched, person);
}

#[tokio::test]
async fn add_person_at_existing_address() {
  let s = store().await;
  let home = s.add_address(springfield()).await.unwrap();
  let person = s
    .add_person(NewPerson::new("Lisa", 8.0).at(home.id))
    .await
    .unwrap();
  assert_eq!(person.address_id, Some(home.id));
  assert_eq!(person.age, 8.0);
}

#[tokio::test]
async fn dangling_address_id_is_rejected() {
  let s = store().await;
  let err = s
    .add_person(NewPerson::new("Nobody", 30.0).at(12345))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AddressNotFound(12345)));
  assert!(s.list_persons().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_finite_age_is_rejected_before_insert() {
  let s = store().await;
  let err = s
    .add_person(NewPerson::new("Nan", f64::NAN))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(schemata_core::Error::InvalidAge(_))));
}

#[tokio::test]
async fn residents_follow_foreign_key() {
  let s = store().await;
  let home = s.add_address(springfield()).await.unwrap();
  let other = s
    .add_address(NewAddress::new("744 Evergreen Terrace", "Springfield", "49007"))
    .await
    .unwrap();

  let homer = s.add_person(NewPerson::new("Homer", 39.0).at(home.id)).await.unwrap();
  let marge = s.add_person(NewPerson::new("Marge", 36.0).at(home.id)).await.unwrap();
  let ned = s.add_person(NewPerson::new("Ned", 60.0).at(other.id)).await.unwrap();
  s.add_person(NewPerson::new("Drifter", 45.0)).await.unwrap();

  let at_home = s.residents(home.id).await.unwrap();
  assert_eq!(at_home.iter().map(|p| p.id).collect::<Vec<_>>(), [homer.id, marge.id]);

  // The in-memory index agrees with the query.
  let everyone = s.list_persons().await.unwrap();
  let index = ResidencyIndex::build(&everyone);
  assert_eq!(index.residents(home.id), &[homer.id, marge.id]);
  assert_eq!(index.residents(other.id), &[ned.id]);
  assert_eq!(index.unhoused().len(), 1);
}

#[tokio::test]
async fn move_person_repoints_and_clears() {
  let s = store().await;
  let a = s.add_address(springfield()).await.unwrap();
  let b = s
    .add_address(NewAddress::new("31 Spooner St", "Quahog", "00093"))
    .await
    .unwrap();
  let p = s.add_person(NewPerson::new("Bart", 10.0).at(a.id)).await.unwrap();

  let moved = s.move_person(p.id, Some(b.id)).await.unwrap();
  assert_eq!(moved.address_id, Some(b.id));
  assert!(s.residents(a.id).await.unwrap().is_empty());

  let cleared = s.move_person(p.id, None).await.unwrap();
  assert_eq!(cleared.address_id, None);
}

#[tokio::test]
async fn move_person_to_missing_address_errors() {
  let s = store().await;
  let p = s.add_person(NewPerson::new("Bart", 10.0)).await.unwrap();
  let err = s.move_person(p.id, Some(77)).await.unwrap_err();
  assert!(matches!(err, Error::AddressNotFound(77)));

  let unchanged = s.get_person(p.id).await.unwrap().unwrap();
  assert_eq!(unchanged.address_id, None);
}

#[tokio::test]
async fn move_missing_person_errors() {
  let s = store().await;
  let err = s.move_person(9, None).await.unwrap_err();
  assert!(matches!(err, Error::PersonNotFound(9)));
}

// ─── Migrations through the store ────────────────────────────────────────────

#[tokio::test]
async fn open_in_memory_is_at_head() {
  let s = store().await;
  assert_eq!(s.current_revision().await.unwrap(), Some("c31efd831ee7"));
  assert_eq!(s.tables().await.unwrap(), ["address", "person"]);
}

#[tokio::test]
async fn upgrade_then_downgrade_on_disk() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("records.db");

  let s = SqliteStore::open_unmigrated(&path).await.unwrap();
  assert!(s.tables().await.unwrap().is_empty());
  assert_eq!(s.current_revision().await.unwrap(), None);

  assert_eq!(s.upgrade(None).await.unwrap(), ["c31efd831ee7"]);
  assert_eq!(s.tables().await.unwrap(), ["address", "person"]);

  assert_eq!(s.downgrade(None).await.unwrap(), ["c31efd831ee7"]);
  assert!(s.tables().await.unwrap().is_empty());
  assert_eq!(s.current_revision().await.unwrap(), None);
}

#[tokio::test]
async fn reopening_keeps_data_and_revision() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("records.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add_address(springfield()).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.current_revision().await.unwrap(), Some("c31efd831ee7"));
  assert!(s.get_address(id).await.unwrap().is_some());
}

#[tokio::test]
async fn downgrade_to_unknown_revision_errors() {
  let s = store().await;
  let err = s.downgrade(Some("nope".into())).await.unwrap_err();
  assert!(matches!(err, Error::UnknownRevision(_)));
  assert_eq!(s.current_revision().await.unwrap(), Some("c31efd831ee7"));
}
