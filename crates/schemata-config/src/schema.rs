//! Field-rule schemas.
//!
//! A [`Schema`] is evaluated field by field in declaration order. Nothing
//! short-circuits: every field is checked and every violation is collected.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FieldError, FieldPath, ValidationErrors};

// ─── Check ───────────────────────────────────────────────────────────────────

/// A constraint on one value.
///
/// Implementations push any violations onto `errors`, located at `path` or
/// below it. A check that converts its input (`"123"` to `123`, say) returns
/// the converted value, which replaces the original in the accepted mapping.
/// Closures `Fn(&Value) -> Result<(), String>` are checks whose error lands
/// at `path` itself and which never convert.
pub trait Check: Send + Sync {
  fn check(
    &self,
    value: &Value,
    path: &FieldPath,
    errors: &mut Vec<FieldError>,
  ) -> Option<Value>;
}

impl<F> Check for F
where
  F: Fn(&Value) -> Result<(), String> + Send + Sync,
{
  fn check(
    &self,
    value: &Value,
    path: &FieldPath,
    errors: &mut Vec<FieldError>,
  ) -> Option<Value> {
    if let Err(message) = self(value) {
      errors.push(FieldError::new(path.clone(), message));
    }
    None
  }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

/// Whether a field may be left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
  /// Absence is reported as `field required`; `null` goes to the check.
  Required,
  /// Absence and `null` are both accepted without running the check.
  Optional,
}

/// What to do with keys no field declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtraPolicy {
  /// Keep them in the accepted mapping.
  Allow,
  /// Drop them silently.
  #[default]
  Ignore,
  /// Report each one as a violation.
  Forbid,
}

struct Field {
  name:     &'static str,
  presence: Presence,
  check:    Box<dyn Check>,
}

/// An ordered list of field rules plus an extra-key policy.
pub struct Schema {
  name:   &'static str,
  fields: Vec<Field>,
  extra:  ExtraPolicy,
}

impl Schema {
  /// An empty schema that ignores unknown keys.
  pub fn new(name: &'static str) -> Self {
    Self {
      name,
      fields: Vec::new(),
      extra: ExtraPolicy::default(),
    }
  }

  pub fn extra(mut self, policy: ExtraPolicy) -> Self {
    self.extra = policy;
    self
  }

  pub fn required(self, name: &'static str, check: impl Check + 'static) -> Self {
    self.field(name, Presence::Required, check)
  }

  pub fn optional(self, name: &'static str, check: impl Check + 'static) -> Self {
    self.field(name, Presence::Optional, check)
  }

  pub fn field(
    mut self,
    name: &'static str,
    presence: Presence,
    check: impl Check + 'static,
  ) -> Self {
    self.fields.push(Field {
      name,
      presence,
      check: Box::new(check),
    });
    self
  }

  pub fn name(&self) -> &'static str { self.name }

  /// Validate `document` against every field.
  ///
  /// On success, returns the document's mapping with converted values
  /// substituted and the extra-key policy applied. On failure, returns every
  /// violation found.
  pub fn validate(&self, document: &Value) -> Result<Map<String, Value>, ValidationErrors> {
    let mut errors = Vec::new();
    let accepted = self.check_at(document, &FieldPath::root(), &mut errors);

    match ValidationErrors::new(self.name, errors) {
      Some(errors) => {
        debug!(schema = self.name, errors = errors.len(), "document rejected");
        Err(errors)
      }
      None => Ok(accepted.unwrap_or_default()),
    }
  }

  fn check_at(
    &self,
    document: &Value,
    path: &FieldPath,
    errors: &mut Vec<FieldError>,
  ) -> Option<Map<String, Value>> {
    let Value::Object(map) = document else {
      errors.push(FieldError::new(path.clone(), "input should be a mapping"));
      return None;
    };

    let mut converted = Vec::new();
    for field in &self.fields {
      let field_path = path.child(field.name);
      match (map.get(field.name), field.presence) {
        (None, Presence::Required) => {
          errors.push(FieldError::new(field_path, "field required"));
        }
        (None | Some(Value::Null), Presence::Optional) => {}
        (Some(value), _) => {
          if let Some(value) = field.check.check(value, &field_path, errors) {
            converted.push((field.name, value));
          }
        }
      }
    }

    let declared = |key: &str| self.fields.iter().any(|f| f.name == key);
    let mut accepted: Map<String, Value> = match self.extra {
      ExtraPolicy::Allow => map.clone(),
      ExtraPolicy::Ignore => map
        .iter()
        .filter(|(key, _)| declared(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect(),
      ExtraPolicy::Forbid => {
        for key in map.keys().filter(|key| !declared(key.as_str())) {
          errors.push(FieldError::new(path.child(key), "extra fields not permitted"));
        }
        map.clone()
      }
    };
    for (name, value) in converted {
      accepted.insert(name.to_owned(), value);
    }
    Some(accepted)
  }
}

/// A schema used as the check of another schema's field. The nested mapping
/// is replaced by its accepted form.
impl Check for Schema {
  fn check(
    &self,
    value: &Value,
    path: &FieldPath,
    errors: &mut Vec<FieldError>,
  ) -> Option<Value> {
    self.check_at(value, path, errors).map(Value::Object)
  }
}

// ─── Typed configs ───────────────────────────────────────────────────────────

/// A typed, immutable view over documents accepted by [`Self::schema`].
pub trait ConfigSchema: DeserializeOwned {
  /// The field rules for this config.
  fn schema() -> Schema;

  /// Serialize back to a plain mapping.
  fn to_map(&self) -> Map<String, Value>;

  /// Validate `document` and build the typed view.
  fn validate(document: &Value) -> Result<Self, ValidationErrors> {
    let schema = Self::schema();
    let accepted = schema.validate(document)?;
    Self::from_accepted(schema.name(), accepted)
  }

  /// Convert a mapping the schema already accepted.
  fn from_accepted(
    schema: &'static str,
    accepted: Map<String, Value>,
  ) -> Result<Self, ValidationErrors> {
    serde_json::from_value(Value::Object(accepted)).map_err(|e| {
      ValidationErrors::single(schema, FieldError::new(FieldPath::root(), e.to_string()))
    })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::checks;

  fn point(extra: ExtraPolicy) -> Schema {
    Schema::new("Point")
      .extra(extra)
      .required("x", checks::integer())
      .required("y", checks::integer())
      .optional("label", checks::string())
  }

  #[test]
  fn collects_every_violation_in_field_order() {
    let errors = point(ExtraPolicy::Ignore)
      .validate(&json!({ "x": "one", "label": 3 }))
      .unwrap_err();
    assert_eq!(errors.paths(), ["x", "y", "label"]);
    assert_eq!(errors.iter().nth(1).unwrap().message, "field required");
  }

  #[test]
  fn optional_accepts_absent_and_null() {
    let schema = point(ExtraPolicy::Ignore);
    assert!(schema.validate(&json!({ "x": 1, "y": 2 })).is_ok());
    assert!(schema.validate(&json!({ "x": 1, "y": 2, "label": null })).is_ok());
  }

  #[test]
  fn required_null_is_checked_not_missing() {
    let errors = point(ExtraPolicy::Ignore)
      .validate(&json!({ "x": null, "y": 2 }))
      .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_ne!(errors.iter().next().unwrap().message, "field required");
  }

  #[test]
  fn extra_policy_is_per_schema() {
    let doc = json!({ "x": 1, "y": 2, "z": 3 });

    let allowed = point(ExtraPolicy::Allow).validate(&doc).unwrap();
    assert_eq!(allowed.get("z"), Some(&json!(3)));

    let ignored = point(ExtraPolicy::Ignore).validate(&doc).unwrap();
    assert!(!ignored.contains_key("z"));
    assert_eq!(ignored.len(), 2);

    let forbidden = point(ExtraPolicy::Forbid).validate(&doc).unwrap_err();
    assert_eq!(forbidden.paths(), ["z"]);
  }

  #[test]
  fn non_mapping_document_is_one_root_error() {
    let errors = point(ExtraPolicy::Ignore).validate(&json!([1, 2])).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.iter().next().unwrap().path.is_root());
  }

  #[test]
  fn nested_schema_reports_full_paths() {
    let schema = Schema::new("Line")
      .required("start", point(ExtraPolicy::Forbid))
      .required("end", point(ExtraPolicy::Forbid));
    let errors = schema
      .validate(&json!({ "start": { "x": 0, "w": 1 }, "end": 5 }))
      .unwrap_err();
    assert_eq!(errors.paths(), ["start.y", "start.w", "end"]);
  }

  #[test]
  fn converted_values_replace_the_input() {
    let accepted = point(ExtraPolicy::Ignore)
      .validate(&json!({ "x": "7", "y": 2.0, "label": "p" }))
      .unwrap();
    assert_eq!(Value::Object(accepted), json!({ "x": 7, "y": 2, "label": "p" }));
  }

  #[test]
  fn nested_mapping_is_accepted_under_its_own_policy() {
    let schema = Schema::new("Line")
      .extra(ExtraPolicy::Allow)
      .required("start", point(ExtraPolicy::Ignore));
    let accepted = schema
      .validate(&json!({ "start": { "x": "1", "y": 2, "w": 9 }, "note": "n" }))
      .unwrap();
    assert_eq!(
      Value::Object(accepted),
      json!({ "start": { "x": 1, "y": 2 }, "note": "n" })
    );
  }

  #[test]
  fn closures_are_checks() {
    let even = |v: &Value| match v.as_i64() {
      Some(n) if n % 2 == 0 => Ok(()),
      _ => Err("input should be an even integer".to_owned()),
    };
    let schema = Schema::new("Even").required("n", even);
    assert!(schema.validate(&json!({ "n": 4 })).is_ok());
    assert!(schema.validate(&json!({ "n": 5 })).unwrap_err().contains("n"));
  }
}
