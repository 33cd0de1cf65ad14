//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use schemata_core::{
  record::{Address, AddressId, NewAddress, NewPerson, Person, PersonId},
  store::RecordStore,
};

use crate::{
  Error, Result,
  migrations::{self, Migrator},
  rows::{
    ADDRESS_COLUMNS, PERSON_COLUMNS, address_from_row, person_from_row,
    person_write_error,
  },
};

/// Per-connection settings; `foreign_keys` is off by default in SQLite and
/// cannot be toggled inside a transaction.
const CONNECTION_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person/address store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:     tokio_rusqlite::Connection,
  migrator: Migrator,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and migrate it to head.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self::open_unmigrated(path).await?;
    store.upgrade(None).await?;
    Ok(store)
  }

  /// Open an in-memory store at head. Used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self::configure(conn).await?;
    store.upgrade(None).await?;
    Ok(store)
  }

  /// Open (or create) a store at `path` without touching its schema.
  pub async fn open_unmigrated(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::configure(conn).await
  }

  async fn configure(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        Ok(())
      })
      .await?;
    Ok(Self {
      conn,
      migrator: Migrator::default(),
    })
  }

  // ── Migrations ────────────────────────────────────────────────────────────

  /// Apply pending migrations up to `target` (default: head).
  pub async fn upgrade(&self, target: Option<String>) -> Result<Vec<&'static str>> {
    let migrator = self.migrator;
    self
      .conn
      .call(move |conn| Ok(migrator.upgrade(conn, target.as_deref())))
      .await?
  }

  /// Revert migrations newer than `target` (default: base).
  pub async fn downgrade(&self, target: Option<String>) -> Result<Vec<&'static str>> {
    let migrator = self.migrator;
    self
      .conn
      .call(move |conn| Ok(migrator.downgrade(conn, target.as_deref())))
      .await?
  }

  /// The most recently applied revision id, or `None` at base.
  pub async fn current_revision(&self) -> Result<Option<&'static str>> {
    let migrator = self.migrator;
    let current = self
      .conn
      .call(move |conn| Ok(migrator.current(conn)))
      .await??;
    Ok(current.map(|m| m.revision))
  }

  /// Names of all user tables currently present.
  pub async fn tables(&self) -> Result<Vec<String>> {
    Ok(
      self
        .conn
        .call(|conn| Ok(migrations::user_tables(conn)?))
        .await?,
    )
  }

  async fn query_persons(
    &self,
    sql: String,
    address_id: Option<AddressId>,
  ) -> Result<Vec<Person>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&sql)?;
          let rows = match address_id {
            Some(id) => stmt.query_map(rusqlite::params![id], person_from_row)?,
            None => stmt.query_map([], person_from_row)?,
          };
          Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await?,
    )
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Addresses ─────────────────────────────────────────────────────────────

  async fn add_address(&self, input: NewAddress) -> Result<Address> {
    let row = input.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO address (street, city, postcode) VALUES (?1, ?2, ?3)",
          rusqlite::params![row.street, row.city, row.postcode],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "added address");
    Ok(input.into_address(id))
  }

  async fn get_address(&self, id: AddressId) -> Result<Option<Address>> {
    let sql = format!("SELECT {ADDRESS_COLUMNS} FROM address WHERE id = ?1");
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(&sql, rusqlite::params![id], address_from_row)
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_addresses(&self) -> Result<Vec<Address>> {
    let sql = format!("SELECT {ADDRESS_COLUMNS} FROM address ORDER BY id");
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map([], address_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    input.check()?;
    let row = input.clone();

    // The foreign-key failure has to be inspected before it is wrapped in
    // `tokio_rusqlite::Error`, so the raw result is passed out.
    let id = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .execute(
              "INSERT INTO person (address_id, name, age) VALUES (?1, ?2, ?3)",
              rusqlite::params![row.address_id, row.name, row.age],
            )
            .map(|_| conn.last_insert_rowid()),
        )
      })
      .await?
      .map_err(|e| person_write_error(e, input.address_id))?;

    tracing::debug!(id, address_id = ?input.address_id, "added person");
    Ok(input.into_person(id))
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let sql = format!("SELECT {PERSON_COLUMNS} FROM person WHERE id = ?1");
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(&sql, rusqlite::params![id], person_from_row)
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    self
      .query_persons(format!("SELECT {PERSON_COLUMNS} FROM person ORDER BY id"), None)
      .await
  }

  async fn residents(&self, address_id: AddressId) -> Result<Vec<Person>> {
    self
      .query_persons(
        format!("SELECT {PERSON_COLUMNS} FROM person WHERE address_id = ?1 ORDER BY id"),
        Some(address_id),
      )
      .await
  }

  async fn move_person(
    &self,
    id: PersonId,
    address_id: Option<AddressId>,
  ) -> Result<Person> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE person SET address_id = ?1 WHERE id = ?2",
          rusqlite::params![address_id, id],
        ))
      })
      .await?
      .map_err(|e| person_write_error(e, address_id))?;

    if changed == 0 {
      return Err(Error::PersonNotFound(id));
    }

    tracing::debug!(id, ?address_id, "moved person");
    self.get_person(id).await?.ok_or(Error::PersonNotFound(id))
  }
}
