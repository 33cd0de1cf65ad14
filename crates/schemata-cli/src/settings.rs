//! Runtime settings for the `schemata` binary.
//!
//! Read from an optional TOML file, then overridden by `SCHEMATA_*`
//! environment variables (e.g. `SCHEMATA_DATABASE_PATH`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
  /// SQLite file holding the person/address tables.
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
}

fn default_database_path() -> PathBuf { PathBuf::from("schemata.db") }

impl Settings {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SCHEMATA"))
      .build()
      .with_context(|| format!("failed to read settings from {}", file.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }
}
