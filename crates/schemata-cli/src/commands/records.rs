//! `schemata address` and `schemata person`.
//!
//! Records are printed one JSON object per line.

use std::path::Path;

use anyhow::Context as _;
use clap::Subcommand;
use schemata_core::{
  record::{AddressId, NewAddress, NewPerson, PersonId},
  store::RecordStore,
};
use schemata_store_sqlite::SqliteStore;
use serde_json::{Map, Value};

#[derive(Subcommand, Debug)]
pub enum AddressAction {
  /// Add an address.
  Add {
    #[arg(long)]
    street:   String,
    #[arg(long)]
    city:     String,
    #[arg(long)]
    postcode: String,
  },
  /// List all addresses.
  List,
  /// List the persons living at an address.
  Residents { id: AddressId },
}

#[derive(Subcommand, Debug)]
pub enum PersonAction {
  /// Add a person, optionally at an existing address.
  Add {
    #[arg(long)]
    name:       String,
    #[arg(long)]
    age:        f64,
    #[arg(long)]
    address_id: Option<AddressId>,
  },
  /// List all persons.
  List,
  /// Move a person to another address, or clear it when omitted.
  Move {
    id:         PersonId,
    #[arg(long)]
    address_id: Option<AddressId>,
  },
}

async fn open(database: &Path) -> anyhow::Result<SqliteStore> {
  SqliteStore::open(database)
    .await
    .with_context(|| format!("failed to open store at {}", database.display()))
}

fn print_record(map: Map<String, Value>) {
  println!("{}", Value::Object(map));
}

pub async fn address(database: &Path, action: AddressAction) -> anyhow::Result<()> {
  let store = open(database).await?;
  match action {
    AddressAction::Add {
      street,
      city,
      postcode,
    } => {
      let address = store
        .add_address(NewAddress::new(street, city, postcode))
        .await?;
      print_record(address.to_map());
    }
    AddressAction::List => {
      for address in store.list_addresses().await? {
        print_record(address.to_map());
      }
    }
    AddressAction::Residents { id } => {
      if store.get_address(id).await?.is_none() {
        anyhow::bail!("address not found: {id}");
      }
      for person in store.residents(id).await? {
        print_record(person.to_map());
      }
    }
  }
  Ok(())
}

pub async fn person(database: &Path, action: PersonAction) -> anyhow::Result<()> {
  let store = open(database).await?;
  match action {
    PersonAction::Add {
      name,
      age,
      address_id,
    } => {
      let input = NewPerson {
        address_id,
        name,
        age,
      };
      let person = store.add_person(input).await?;
      print_record(person.to_map());
    }
    PersonAction::List => {
      for person in store.list_persons().await? {
        print_record(person.to_map());
      }
    }
    PersonAction::Move { id, address_id } => {
      let person = store.move_person(id, address_id).await?;
      print_record(person.to_map());
    }
  }
  Ok(())
}
