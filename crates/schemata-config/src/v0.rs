//! `ConfigV0`, the three-field schema that predates `ConfigV1`. Unknown keys
//! are dropped.

use serde::Deserialize;
use serde_json::{Map, Value};
use strum::VariantNames as _;

use crate::{
  checks::{integer, literal, one_of},
  schema::{ConfigSchema, Schema},
  v1::{ProjectEnv, SCHEMA_VERSION},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigV0 {
  #[serde(rename = "SCHEMA_VERSION")]
  schema_version: String,
  #[serde(rename = "PROJECT_ID")]
  project_id:     i64,
  #[serde(rename = "PROJECT_ENV")]
  project_env:    ProjectEnv,
}

impl ConfigV0 {
  pub fn schema_version(&self) -> &str { &self.schema_version }

  pub fn project_id(&self) -> i64 { self.project_id }

  pub fn project_env(&self) -> ProjectEnv { self.project_env }
}

impl ConfigSchema for ConfigV0 {
  fn schema() -> Schema {
    Schema::new("ConfigV0")
      .required("SCHEMA_VERSION", literal(SCHEMA_VERSION))
      .required("PROJECT_ID", integer())
      .required("PROJECT_ENV", one_of(ProjectEnv::VARIANTS))
  }

  fn to_map(&self) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("SCHEMA_VERSION".into(), self.schema_version.clone().into());
    map.insert("PROJECT_ID".into(), self.project_id.into());
    map.insert("PROJECT_ENV".into(), self.project_env.as_ref().into());
    map
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn unknown_keys_are_dropped() {
    let doc = json!({
      "SCHEMA_VERSION": "0.1",
      "PROJECT_ID": 7,
      "PROJECT_ENV": "test",
      "NOTES": "ignored",
    });
    let config = ConfigV0::validate(&doc).unwrap();
    assert_eq!(config.project_env(), ProjectEnv::Test);
    assert!(!config.to_map().contains_key("NOTES"));
    assert_eq!(config.to_map().len(), 3);
  }

  #[test]
  fn demo_document_fails_on_environment_only() {
    let doc = json!({ "SCHEMA_VERSION": "0.1", "PROJECT_ID": 123, "PROJECT_ENV": "devv" });
    let errors = ConfigV0::validate(&doc).unwrap_err();
    assert_eq!(errors.paths(), ["PROJECT_ENV"]);
  }
}
