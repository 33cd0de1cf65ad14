//! Schema validation for project configuration documents.
//!
//! A [`Schema`] is an ordered list of `(field, presence, check)` entries. It
//! is evaluated in full against a plain mapping and reports every violation
//! at once as [`ValidationErrors`]. Typed views ([`ConfigV1`], [`ConfigV0`])
//! sit on top: validate with the schema, then deserialize.
//!
//! Documents are parsed elsewhere ([`load_document`] handles YAML and JSON
//! files); the validator only ever sees a [`serde_json::Value`].
//!
//! ```no_run
//! use schemata_config::{ConfigSchema, ConfigV1};
//! use serde_json::json;
//!
//! let doc = json!({ "SCHEMA_VERSION": "0.1", "PROJECT_ID": 123, "PROJECT_ENV": "devv" });
//! if let Err(errors) = ConfigV1::validate(&doc) {
//!   for e in errors.iter() {
//!     eprintln!("ERROR: {} --> {}", e.path, e.message);
//!   }
//! }
//! ```

pub mod checks;
pub mod error;
mod load;
pub mod schema;
mod v0;
mod v1;

pub use error::{Error, FieldError, FieldPath, Result, ValidationErrors};
pub use load::{get_config, get_config_as_dict, load_config, load_document};
pub use schema::{Check, ConfigSchema, ExtraPolicy, Presence, Schema};
pub use v0::ConfigV0;
pub use v1::{ConfigV1, ProjectEnv, SCHEMA_VERSION, UserCert};
