//! Stock field checks.
//!
//! Each constructor returns a value implementing [`Check`](crate::Check).
//! Messages describe what the input should have been.

use std::{fs, path::Path};

use serde_json::Value;
use url::Url;

use crate::{
  Check,
  error::{FieldError, FieldPath},
};

/// The value must be exactly the string `expected`.
pub fn literal(expected: &'static str) -> impl Fn(&Value) -> Result<(), String> + Send + Sync {
  move |value| match value {
    Value::String(s) if s == expected => Ok(()),
    _ => Err(format!("input should be {expected:?}")),
  }
}

/// The value must be one of the strings in `allowed`.
pub fn one_of(
  allowed: &'static [&'static str],
) -> impl Fn(&Value) -> Result<(), String> + Send + Sync {
  move |value| match value {
    Value::String(s) if allowed.contains(&s.as_str()) => Ok(()),
    _ => {
      let options = allowed
        .iter()
        .map(|a| format!("{a:?}"))
        .collect::<Vec<_>>()
        .join(", ");
      Err(format!("input should be one of {options}"))
    }
  }
}

/// The value must be an integer that fits in `i64`. See [`Integer`].
pub fn integer() -> Integer { Integer }

/// Integer check that also takes floats with no fractional part and strings
/// holding an integer, converting both to a JSON integer. Booleans are
/// rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

impl Integer {
  fn convert(value: &Value) -> Result<i64, String> {
    match value {
      Value::Number(n) => {
        if let Some(n) = n.as_i64() {
          Ok(n)
        } else if n.is_u64() {
          Err("integer out of range".to_owned())
        } else {
          let f = n.as_f64().unwrap_or(f64::NAN);
          if f.fract() != 0.0 {
            Err(
              "input should be a valid integer, got a number with a fractional part"
                .to_owned(),
            )
          } else if f < i64::MIN as f64 || f >= i64::MAX as f64 {
            Err("integer out of range".to_owned())
          } else {
            Ok(f as i64)
          }
        }
      }
      Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
        "input should be a valid integer, unable to parse string as an integer".to_owned()
      }),
      _ => Err("input should be a valid integer".to_owned()),
    }
  }
}

impl Check for Integer {
  fn check(
    &self,
    value: &Value,
    path: &FieldPath,
    errors: &mut Vec<FieldError>,
  ) -> Option<Value> {
    match Self::convert(value) {
      Ok(n) => Some(n.into()),
      Err(message) => {
        errors.push(FieldError::new(path.clone(), message));
        None
      }
    }
  }
}

/// The value must be a string.
pub fn string() -> impl Fn(&Value) -> Result<(), String> + Send + Sync {
  |value| match value {
    Value::String(_) => Ok(()),
    _ => Err("input should be a valid string".to_owned()),
  }
}

/// The value must be an absolute `http` or `https` URL with a host.
pub fn http_url() -> impl Fn(&Value) -> Result<(), String> + Send + Sync {
  |value| {
    let Value::String(raw) = value else {
      return Err("URL input should be a string".to_owned());
    };
    let url = Url::parse(raw).map_err(|e| format!("input should be a valid URL, {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
      return Err("URL scheme should be 'http' or 'https'".to_owned());
    }
    if url.host().is_none() {
      return Err("URL should have a host".to_owned());
    }
    Ok(())
  }
}

/// The value must be a path to an existing regular file. Relative paths
/// resolve against the working directory.
pub fn existing_file() -> impl Fn(&Value) -> Result<(), String> + Send + Sync {
  |value| {
    let Value::String(raw) = value else {
      return Err("input should be a valid path".to_owned());
    };
    match fs::metadata(Path::new(raw)) {
      Ok(meta) if meta.is_file() => Ok(()),
      Ok(_) => Err(format!("path {raw:?} does not point to a file")),
      Err(_) => Err(format!("path {raw:?} does not exist")),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn literal_is_exact_and_string_typed() {
    let check = literal("0.1");
    assert!(check(&json!("0.1")).is_ok());
    assert!(check(&json!("0.10")).is_err());
    assert!(check(&json!(0.1)).is_err());
  }

  #[test]
  fn one_of_lists_the_options() {
    let check = one_of(&["dev", "test", "prod"]);
    assert!(check(&json!("prod")).is_ok());
    assert_eq!(
      check(&json!("devv")).unwrap_err(),
      r#"input should be one of "dev", "test", "prod""#
    );
  }

  fn run_integer(value: Value) -> Result<Value, String> {
    let mut errors = Vec::new();
    let converted = integer().check(&value, &FieldPath::root(), &mut errors);
    match (converted, errors.pop()) {
      (Some(n), None) => Ok(n),
      (None, Some(error)) => Err(error.message),
      other => panic!("check returned {other:?}"),
    }
  }

  #[test]
  fn integer_converts_integral_lookalikes() {
    assert_eq!(run_integer(json!(123)), Ok(json!(123)));
    assert_eq!(run_integer(json!(-4)), Ok(json!(-4)));
    assert_eq!(run_integer(json!(2.0)), Ok(json!(2)));
    assert_eq!(run_integer(json!("123")), Ok(json!(123)));
    assert_eq!(run_integer(json!(" -7 ")), Ok(json!(-7)));
  }

  #[test]
  fn integer_rejects_everything_else() {
    assert!(run_integer(json!(1.5)).unwrap_err().contains("fractional part"));
    assert!(run_integer(json!("12a")).unwrap_err().contains("unable to parse"));
    assert!(run_integer(json!("1.0")).is_err());
    assert!(run_integer(json!(true)).is_err());
    assert!(run_integer(json!(null)).is_err());
    assert_eq!(run_integer(json!(u64::MAX)).unwrap_err(), "integer out of range");
    assert_eq!(run_integer(json!(1e20)).unwrap_err(), "integer out of range");
  }

  #[test]
  fn http_url_requires_scheme_and_host() {
    let check = http_url();
    assert!(check(&json!("https://vault.example.com/secrets/cert")).is_ok());
    assert!(check(&json!("http://localhost:8200")).is_ok());
    assert!(check(&json!("not a url")).is_err());
    assert!(check(&json!("ftp://example.com/cert")).is_err());
    assert!(check(&json!("https://")).is_err());
    assert!(check(&json!(42)).is_err());
  }

  #[test]
  fn existing_file_checks_disk() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let check = existing_file();

    assert!(check(&json!(file.path())).is_ok());
    assert!(check(&json!(dir.path())).unwrap_err().contains("does not point to a file"));
    assert!(
      check(&json!(dir.path().join("missing.pem")))
        .unwrap_err()
        .contains("does not exist")
    );
  }
}
