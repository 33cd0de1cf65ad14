//! `schemata`: validate project config files and manage the person/address
//! store.
//!
//! # Usage
//!
//! ```text
//! schemata validate config.yaml
//! schemata migrate up
//! schemata address add --street "742 Evergreen Terrace" --city Springfield --postcode 49007
//! schemata person add --name Homer --age 39 --address-id 1
//! schemata --database other.db migrate down --to base
//! ```

mod commands;
mod settings;

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
  migrate::MigrateAction,
  records::{AddressAction, PersonAction},
  validate::SchemaVersion,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "schemata",
  version,
  about = "Validate project config and manage the person/address store"
)]
struct Cli {
  /// Path to a TOML settings file.
  #[arg(short, long, value_name = "FILE", default_value = "schemata.toml", global = true)]
  config: PathBuf,

  /// SQLite database file; overrides `database_path` from settings.
  #[arg(long, value_name = "FILE", global = true)]
  database: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Validate a YAML or JSON config file and print it back as JSON.
  Validate {
    file: PathBuf,

    /// Schema to validate against.
    #[arg(long, value_enum, default_value_t = SchemaVersion::V1)]
    schema: SchemaVersion,
  },

  /// Apply, revert, or inspect schema migrations.
  Migrate {
    #[command(subcommand)]
    action: MigrateAction,
  },

  /// Manage addresses.
  Address {
    #[command(subcommand)]
    action: AddressAction,
  },

  /// Manage persons.
  Person {
    #[command(subcommand)]
    action: PersonAction,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    // Validation never touches settings or the database.
    Command::Validate { file, schema } => commands::validate::run(&file, schema),
    Command::Migrate { action } => {
      let database = database_path(&cli.config, cli.database)?;
      commands::migrate::run(&database, action).await?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Address { action } => {
      let database = database_path(&cli.config, cli.database)?;
      commands::records::address(&database, action).await?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Person { action } => {
      let database = database_path(&cli.config, cli.database)?;
      commands::records::person(&database, action).await?;
      Ok(ExitCode::SUCCESS)
    }
  }
}

/// The `--database` flag wins over the settings file and environment.
fn database_path(settings_file: &Path, flag: Option<PathBuf>) -> Result<PathBuf> {
  let database = match flag {
    Some(path) => path,
    None => settings::Settings::load(settings_file)?.database_path,
  };
  tracing::debug!(database = %database.display(), "using database");
  Ok(database)
}
