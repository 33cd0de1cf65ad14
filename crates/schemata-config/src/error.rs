//! Error types for `schemata-config`.

use std::{fmt, path::PathBuf};

use thiserror::Error;

// ─── Field errors ────────────────────────────────────────────────────────────

/// Location of a value inside a document, as a list of mapping keys.
/// The empty path is the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
  pub fn root() -> Self { Self::default() }

  pub fn is_root(&self) -> bool { self.0.is_empty() }

  /// This path extended by `key`.
  pub fn child(&self, key: &str) -> Self {
    let mut keys = self.0.clone();
    keys.push(key.to_owned());
    Self(keys)
  }

  pub fn keys(&self) -> &[String] { &self.0 }
}

impl fmt::Display for FieldPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_root() {
      return f.write_str("<root>");
    }
    f.write_str(&self.0.join("."))
  }
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub path:    FieldPath,
  pub message: String,
}

impl FieldError {
  pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
    Self {
      path,
      message: message.into(),
    }
  }
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.path, self.message)
  }
}

/// Every violation found while validating one document. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
  schema: &'static str,
  errors: Vec<FieldError>,
}

impl ValidationErrors {
  /// `None` if `errors` is empty.
  pub fn new(schema: &'static str, errors: Vec<FieldError>) -> Option<Self> {
    (!errors.is_empty()).then_some(Self { schema, errors })
  }

  pub fn single(schema: &'static str, error: FieldError) -> Self {
    Self {
      schema,
      errors: vec![error],
    }
  }

  /// Name of the schema that rejected the document.
  pub fn schema(&self) -> &'static str { self.schema }

  pub fn len(&self) -> usize { self.errors.len() }

  pub fn is_empty(&self) -> bool { self.errors.is_empty() }

  pub fn iter(&self) -> std::slice::Iter<'_, FieldError> { self.errors.iter() }

  /// Dotted paths of all violations, in report order.
  pub fn paths(&self) -> Vec<String> {
    self.errors.iter().map(|e| e.path.to_string()).collect()
  }

  /// Whether any violation is reported at the dotted `path`.
  pub fn contains(&self, path: &str) -> bool {
    self.errors.iter().any(|e| e.path.to_string() == path)
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let noun = if self.errors.len() == 1 { "error" } else { "errors" };
    write!(f, "{} validation {noun} for {}", self.errors.len(), self.schema)?;
    for error in &self.errors {
      write!(f, "\n  {error}")?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
  type Item = &'a FieldError;
  type IntoIter = std::slice::Iter<'a, FieldError>;

  fn into_iter(self) -> Self::IntoIter { self.errors.iter() }
}

// ─── Crate error ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("yaml error: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The file extension is not one of `yaml`, `yml`, `json`.
  #[error("unsupported config format: {}", .0.display())]
  UnsupportedFormat(PathBuf),

  #[error(transparent)]
  Validation(#[from] ValidationErrors),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
