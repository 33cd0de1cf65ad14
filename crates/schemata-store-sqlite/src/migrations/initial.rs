//! Revision `c31efd831ee7`: the `address` and `person` tables.
//!
//! `person.address_id` references `address.id`, so `address` is created
//! first and dropped last.

use rusqlite::Connection;

use super::Migration;

pub const MIGRATION: Migration = Migration {
  revision:      "c31efd831ee7",
  down_revision: None,
  message:       "initial migration",
  upgrade,
  downgrade,
};

pub fn upgrade(conn: &Connection) -> rusqlite::Result<()> {
  conn.execute_batch(
    "
    CREATE TABLE address (
        id        INTEGER NOT NULL PRIMARY KEY,
        street    TEXT    NOT NULL,
        city      TEXT    NOT NULL,
        postcode  TEXT    NOT NULL
    );

    CREATE TABLE person (
        id          INTEGER NOT NULL PRIMARY KEY,
        address_id  INTEGER REFERENCES address(id),
        name        TEXT    NOT NULL,
        age         REAL    NOT NULL
    );

    CREATE INDEX person_address_idx ON person(address_id);
    ",
  )
}

pub fn downgrade(conn: &Connection) -> rusqlite::Result<()> {
  conn.execute_batch(
    "
    DROP TABLE person;
    DROP TABLE address;
    ",
  )
}
