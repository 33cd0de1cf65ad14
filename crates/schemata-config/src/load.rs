//! Reading config documents from disk.

use std::{fs, path::Path};

use serde_json::{Map, Value};
use tracing::debug;

use crate::{ConfigSchema, ConfigV1, Error, Result};

/// Parse a YAML (`.yaml`, `.yml`) or JSON (`.json`) file into a plain value.
/// No validation happens here.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value> {
  let path = path.as_ref();
  let extension = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase);

  let yaml = match extension.as_deref() {
    Some("yaml" | "yml") => true,
    Some("json") => false,
    _ => return Err(Error::UnsupportedFormat(path.to_owned())),
  };

  let raw = fs::read_to_string(path).map_err(|source| Error::Io {
    path: path.to_owned(),
    source,
  })?;
  let document: Value = if yaml {
    serde_yaml::from_str(&raw)?
  } else {
    serde_json::from_str(&raw)?
  };
  debug!(path = %path.display(), "loaded config document");
  Ok(document)
}

/// Load `path` and validate it as `C`.
pub fn load_config<C: ConfigSchema>(path: impl AsRef<Path>) -> Result<C> {
  let document = load_document(path)?;
  Ok(C::validate(&document)?)
}

/// Load `path` as a [`ConfigV1`].
pub fn get_config(path: impl AsRef<Path>) -> Result<ConfigV1> { load_config(path) }

/// Load `path`, validate it as a [`ConfigV1`], and return the mapping as it
/// was loaded.
pub fn get_config_as_dict(path: impl AsRef<Path>) -> Result<Map<String, Value>> {
  let document = load_document(path)?;
  ConfigV1::validate(&document)?;
  // Only a mapping validates.
  Ok(match document {
    Value::Object(map) => map,
    _ => Map::new(),
  })
}
