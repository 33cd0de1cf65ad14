//! Revisioned schema migrations.
//!
//! Each [`Migration`] is an `upgrade`/`downgrade` pair over a plain
//! [`Connection`]; storage errors are returned unmodified. The chain is
//! linked through `down_revision`, oldest first.
//!
//! The number of applied revisions is kept in `PRAGMA user_version`, so a
//! fresh database (version 0) is at base. [`Migrator`] runs every step in
//! its own transaction and bumps the version in the same transaction.

pub mod initial;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::{Error, Result};

/// Every known revision, oldest first.
pub const MIGRATIONS: &[Migration] = &[initial::MIGRATION];

/// Target name for "no revisions applied".
pub const BASE: &str = "base";

/// Target name for "latest revision".
pub const HEAD: &str = "head";

// ─── Migration ───────────────────────────────────────────────────────────────

/// One step of the schema history.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
  pub revision:      &'static str,
  /// Revision this one applies on top of; `None` for the first.
  pub down_revision: Option<&'static str>,
  pub message:       &'static str,
  pub upgrade:       fn(&Connection) -> rusqlite::Result<()>,
  pub downgrade:     fn(&Connection) -> rusqlite::Result<()>,
}

// ─── Migrator ────────────────────────────────────────────────────────────────

/// Applies and reverts a revision chain against a connection.
#[derive(Debug, Clone, Copy)]
pub struct Migrator {
  chain: &'static [Migration],
}

impl Default for Migrator {
  fn default() -> Self { Self { chain: MIGRATIONS } }
}

impl Migrator {
  /// Use a custom chain. Fails unless every `down_revision` names the
  /// preceding entry.
  pub fn with_chain(chain: &'static [Migration]) -> Result<Self> {
    let mut parent = None;
    for migration in chain {
      if migration.down_revision != parent {
        return Err(Error::BrokenChain {
          revision: migration.revision,
          expected: parent,
          found:    migration.down_revision,
        });
      }
      parent = Some(migration.revision);
    }
    Ok(Self { chain })
  }

  /// The chain, oldest first.
  pub fn history(&self) -> &'static [Migration] { self.chain }

  /// The most recently applied revision, or `None` at base.
  pub fn current(&self, conn: &Connection) -> Result<Option<&'static Migration>> {
    let applied = self.applied(conn)?;
    Ok(applied.checked_sub(1).map(|i| &self.chain[i]))
  }

  /// Apply pending revisions up to and including `target` (default: head).
  ///
  /// Returns the revisions applied, in order. A target at or below the
  /// current revision applies nothing.
  pub fn upgrade(
    &self,
    conn: &mut Connection,
    target: Option<&str>,
  ) -> Result<Vec<&'static str>> {
    let applied = self.applied(conn)?;
    let goal = self.position(target.unwrap_or(HEAD))?;
    if goal <= applied {
      debug!(applied, goal, "nothing to upgrade");
      return Ok(Vec::new());
    }

    let mut done = Vec::with_capacity(goal - applied);
    for (index, migration) in self.chain.iter().enumerate().take(goal).skip(applied) {
      let tx = conn.transaction()?;
      (migration.upgrade)(&tx)?;
      set_user_version(&tx, index + 1)?;
      tx.commit()?;
      info!(revision = migration.revision, message = migration.message, "applied migration");
      done.push(migration.revision);
    }
    Ok(done)
  }

  /// Revert applied revisions newer than `target` (default: base), newest
  /// first.
  ///
  /// Returns the revisions reverted, in order. A target at or above the
  /// current revision reverts nothing.
  pub fn downgrade(
    &self,
    conn: &mut Connection,
    target: Option<&str>,
  ) -> Result<Vec<&'static str>> {
    let applied = self.applied(conn)?;
    let goal = self.position(target.unwrap_or(BASE))?;
    if goal >= applied {
      debug!(applied, goal, "nothing to downgrade");
      return Ok(Vec::new());
    }

    let mut done = Vec::with_capacity(applied - goal);
    for index in (goal..applied).rev() {
      let migration = &self.chain[index];
      let tx = conn.transaction()?;
      (migration.downgrade)(&tx)?;
      set_user_version(&tx, index)?;
      tx.commit()?;
      info!(revision = migration.revision, "reverted migration");
      done.push(migration.revision);
    }
    Ok(done)
  }

  /// Number of applied revisions, as recorded in `user_version`.
  fn applied(&self, conn: &Connection) -> Result<usize> {
    let version: i64 =
      conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    usize::try_from(version)
      .ok()
      .filter(|&v| v <= self.chain.len())
      .ok_or(Error::UnknownSchemaVersion(version))
  }

  /// Number of revisions applied once `target` is reached.
  fn position(&self, target: &str) -> Result<usize> {
    match target {
      BASE => Ok(0),
      HEAD => Ok(self.chain.len()),
      rev => self
        .chain
        .iter()
        .position(|m| m.revision == rev)
        .map(|i| i + 1)
        .ok_or_else(|| Error::UnknownRevision(rev.to_owned())),
    }
  }
}

fn set_user_version(conn: &Connection, version: usize) -> rusqlite::Result<()> {
  // Chains are tiny; the cast cannot truncate.
  conn.pragma_update(None, "user_version", version as i64)
}

/// Names of all user tables, sorted.
pub fn user_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT name FROM sqlite_master
     WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'
     ORDER BY name",
  )?;
  stmt
    .query_map([], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()
}
