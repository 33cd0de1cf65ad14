//! `ConfigV1`, the current project config schema.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use strum::VariantNames as _;
use url::Url;

use crate::{
  checks::{existing_file, http_url, integer, literal, one_of, string},
  schema::{ConfigSchema, ExtraPolicy, Schema},
};

/// The only accepted `SCHEMA_VERSION`.
pub const SCHEMA_VERSION: &str = "0.1";

/// Deployment environment.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Deserialize,
  strum::AsRefStr,
  strum::Display,
  strum::EnumString,
  strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectEnv {
  Dev,
  Test,
  Prod,
}

/// Where the user's certificate lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserCert {
  secret_resource_name: Url,
  filename:             PathBuf,
}

impl UserCert {
  fn schema() -> Schema {
    Schema::new("UserCert")
      .required("secret_resource_name", http_url())
      .required("filename", existing_file())
  }

  pub fn secret_resource_name(&self) -> &Url { &self.secret_resource_name }

  pub fn filename(&self) -> &Path { &self.filename }

  fn to_map(&self) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
      "secret_resource_name".into(),
      self.secret_resource_name.as_str().into(),
    );
    map.insert(
      "filename".into(),
      self.filename.to_string_lossy().into_owned().into(),
    );
    map
  }
}

/// Validated project config. Immutable once built; unknown top-level keys
/// are kept as they were and come back out of [`ConfigSchema::to_map`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigV1 {
  #[serde(rename = "SCHEMA_VERSION")]
  schema_version: String,
  #[serde(rename = "PROJECT_ID")]
  project_id:     i64,
  #[serde(rename = "PROJECT_ENV")]
  project_env:    ProjectEnv,
  #[serde(rename = "USER_CERT")]
  user_cert:      UserCert,
  #[serde(rename = "USER_TAG", default)]
  user_tag:       Option<String>,
  #[serde(flatten)]
  extra:          Map<String, Value>,
}

impl ConfigV1 {
  pub fn schema_version(&self) -> &str { &self.schema_version }

  pub fn project_id(&self) -> i64 { self.project_id }

  pub fn project_env(&self) -> ProjectEnv { self.project_env }

  pub fn user_cert(&self) -> &UserCert { &self.user_cert }

  pub fn user_tag(&self) -> Option<&str> { self.user_tag.as_deref() }

  /// Top-level keys the schema does not declare.
  pub fn extra(&self) -> &Map<String, Value> { &self.extra }
}

impl ConfigSchema for ConfigV1 {
  fn schema() -> Schema {
    Schema::new("ConfigV1")
      .extra(ExtraPolicy::Allow)
      .required("SCHEMA_VERSION", literal(SCHEMA_VERSION))
      .required("PROJECT_ID", integer())
      .required("PROJECT_ENV", one_of(ProjectEnv::VARIANTS))
      .required("USER_CERT", UserCert::schema())
      .optional("USER_TAG", string())
  }

  fn to_map(&self) -> Map<String, Value> {
    let mut map = self.extra.clone();
    map.insert("SCHEMA_VERSION".into(), self.schema_version.clone().into());
    map.insert("PROJECT_ID".into(), self.project_id.into());
    map.insert("PROJECT_ENV".into(), self.project_env.as_ref().into());
    map.insert("USER_CERT".into(), Value::Object(self.user_cert.to_map()));
    if let Some(tag) = &self.user_tag {
      map.insert("USER_TAG".into(), tag.clone().into());
    }
    map
  }
}
