//! `schemata migrate`.

use std::path::Path;

use anyhow::Context as _;
use clap::Subcommand;
use schemata_store_sqlite::{Migration, Migrator, SqliteStore};

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
  /// Apply migrations up to a revision (default: head).
  Up {
    /// Target revision id, or `head`.
    #[arg(long)]
    to: Option<String>,
  },
  /// Revert migrations down to a revision (default: base).
  Down {
    /// Target revision id, or `base`.
    #[arg(long)]
    to: Option<String>,
  },
  /// Print the current revision.
  Current,
  /// List every known revision, oldest first.
  History,
}

pub async fn run(database: &Path, action: MigrateAction) -> anyhow::Result<()> {
  let store = SqliteStore::open_unmigrated(database)
    .await
    .with_context(|| format!("failed to open store at {}", database.display()))?;

  match action {
    MigrateAction::Up { to } => {
      let applied = store.upgrade(to).await.context("upgrade failed")?;
      if applied.is_empty() {
        println!("already up to date");
      }
      for revision in applied {
        println!("applied {revision}");
      }
    }
    MigrateAction::Down { to } => {
      let reverted = store.downgrade(to).await.context("downgrade failed")?;
      if reverted.is_empty() {
        println!("nothing to revert");
      }
      for revision in reverted {
        println!("reverted {revision}");
      }
    }
    MigrateAction::Current => {
      let current = store.current_revision().await?;
      println!("{}", current.unwrap_or("<base>"));
    }
    MigrateAction::History => {
      let current = store.current_revision().await?;
      let history = Migrator::default().history();
      for (index, migration) in history.iter().enumerate() {
        let is_head = index + 1 == history.len();
        println!("{}", history_line(migration, is_head, current == Some(migration.revision)));
      }
    }
  }
  Ok(())
}

fn history_line(migration: &Migration, is_head: bool, is_current: bool) -> String {
  let mut line = format!(
    "{} -> {}",
    migration.down_revision.unwrap_or("<base>"),
    migration.revision
  );
  if is_head {
    line.push_str(" (head)");
  }
  if is_current {
    line.push_str(" (current)");
  }
  line.push_str(", ");
  line.push_str(migration.message);
  line
}
