//! `schemata validate`.

use std::{path::Path, process::ExitCode};

use anyhow::Context as _;
use clap::ValueEnum;
use schemata_config::{ConfigSchema, ConfigV0, ConfigV1, ValidationErrors, load_document};
use serde_json::{Map, Value};

/// Which config schema to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaVersion {
  /// Three-field schema; unknown keys are dropped.
  V0,
  /// Full schema with certificate and tag; unknown keys are kept.
  V1,
}

/// Validate `file`, print the normalized config on success or one line per
/// violation on failure.
pub fn run(file: &Path, schema: SchemaVersion) -> anyhow::Result<ExitCode> {
  let document = load_document(file)
    .with_context(|| format!("failed to load {}", file.display()))?;

  match validate(&document, schema) {
    Ok(map) => {
      println!("{}", serde_json::to_string_pretty(&Value::Object(map))?);
      Ok(ExitCode::SUCCESS)
    }
    Err(errors) => {
      for line in report(&errors) {
        println!("{line}");
      }
      tracing::warn!(file = %file.display(), errors = errors.len(), "config is invalid");
      Ok(ExitCode::FAILURE)
    }
  }
}

fn validate(
  document: &Value,
  schema: SchemaVersion,
) -> Result<Map<String, Value>, ValidationErrors> {
  match schema {
    SchemaVersion::V0 => ConfigV0::validate(document).map(|c| c.to_map()),
    SchemaVersion::V1 => ConfigV1::validate(document).map(|c| c.to_map()),
  }
}

fn report(errors: &ValidationErrors) -> Vec<String> {
  errors
    .iter()
    .map(|e| format!("ERROR: {} --> {}", e.path, e.message))
    .collect()
}
