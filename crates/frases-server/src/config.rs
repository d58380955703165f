//! Runtime configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file, `FRASES_*`
//! environment variables (`__` separates nested keys, e.g.
//! `FRASES_FIRESTORE__PROJECT_ID`), and finally the conventional `PORT`.
//!
//! `NODE_ENV=production` switches the default mode to production; an explicit
//! `mode` from the file or `FRASES_MODE` still wins.

use std::path::{Path, PathBuf};

use config::{
  Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState,
};
use frases_store_firestore::DEFAULT_COLLECTION;
use serde::Deserialize;

/// Name of the document written by the file backend.
pub const STORE_FILE: &str = "frases.json";

/// Deployment mode; decides where the file backend keeps its document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  /// Persistent document under `data_dir` (default `./data`).
  #[default]
  Development,
  /// Ephemeral document in the system temp directory, emptied on start.
  Production,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  File,
  Firestore,
}

/// Settings for [`Backend::Firestore`].
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreSettings {
  /// Service-account key file; falls back to `GOOGLE_APPLICATION_CREDENTIALS`.
  pub credentials_path: Option<PathBuf>,
  /// Overrides the project named in the key file.
  pub project_id:       Option<String>,
  #[serde(default = "default_collection")]
  pub collection:       String,
  /// `host:port` of a Firestore emulator; falls back to
  /// `FIRESTORE_EMULATOR_HOST`. No credentials are used when set.
  pub emulator_host:    Option<String>,
}

fn default_collection() -> String { DEFAULT_COLLECTION.to_string() }

impl Default for FirestoreSettings {
  fn default() -> Self {
    Self {
      credentials_path: None,
      project_id:       None,
      collection:       default_collection(),
      emulator_host:    None,
    }
  }
}

impl FirestoreSettings {
  pub fn credentials_path(&self) -> Option<PathBuf> {
    self.credentials_path.clone().or_else(|| {
      std::env::var_os("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from)
    })
  }

  pub fn emulator_host(&self) -> Option<String> {
    self
      .emulator_host
      .clone()
      .or_else(|| std::env::var("FIRESTORE_EMULATOR_HOST").ok())
      .filter(|h| !h.is_empty())
  }
}

/// Server configuration, deserialised from the layered sources.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:      String,
  pub port:      u16,
  #[serde(default)]
  pub mode:      Mode,
  #[serde(default)]
  pub backend:   Backend,
  /// Directory of the development-mode document.
  pub data_dir:  Option<PathBuf>,
  #[serde(default)]
  pub firestore: FirestoreSettings,
}

impl ServerConfig {
  /// Load from `path` (optional on disk) plus the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let node_env = std::env::var("NODE_ENV").ok();
    defaults(node_env.as_deref())?
      .add_source(File::from(path).required(false))
      .add_source(
        Environment::with_prefix("FRASES")
          .prefix_separator("_")
          .separator("__"),
      )
      .set_override_option("port", std::env::var("PORT").ok())?
      .build()?
      .try_deserialize()
  }

  /// Where the file backend keeps its document.
  pub fn store_path(&self) -> PathBuf {
    match self.mode {
      Mode::Production => std::env::temp_dir().join(STORE_FILE),
      Mode::Development => self
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("data"))
        .join(STORE_FILE),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

fn defaults(
  node_env: Option<&str>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
  Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", 3001)?
    .set_default("mode", default_mode(node_env))?
    .set_default("backend", "file")
}

fn default_mode(node_env: Option<&str>) -> &'static str {
  match node_env {
    Some("production") => "production",
    _ => "development",
  }
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    defaults(None)
      .unwrap()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_apply_without_a_file() {
    let cfg = from_toml("");
    assert_eq!(cfg.address(), "0.0.0.0:3001");
    assert_eq!(cfg.mode, Mode::Development);
    assert_eq!(cfg.backend, Backend::File);
    assert_eq!(cfg.firestore.collection, "frases");
    assert_eq!(cfg.store_path(), PathBuf::from("data").join("frases.json"));
  }

  #[test]
  fn production_uses_temp_dir() {
    let cfg = from_toml(r#"mode = "production""#);
    assert_eq!(cfg.store_path(), std::env::temp_dir().join("frases.json"));
  }

  #[test]
  fn development_honours_data_dir() {
    let cfg = from_toml(r#"data_dir = "/var/lib/frases""#);
    assert_eq!(cfg.store_path(), PathBuf::from("/var/lib/frases/frases.json"));
  }

  #[test]
  fn firestore_section() {
    let cfg = from_toml(
      r#"
        port = 8080
        backend = "firestore"

        [firestore]
        project_id = "demo"
        collection = "pruebas"
        emulator_host = "localhost:8081"
      "#,
    );
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.backend, Backend::Firestore);
    assert_eq!(cfg.firestore.project_id.as_deref(), Some("demo"));
    assert_eq!(cfg.firestore.collection, "pruebas");
    assert_eq!(cfg.firestore.emulator_host().as_deref(), Some("localhost:8081"));
  }

  #[test]
  fn unknown_mode_is_rejected() {
    let result = defaults(None)
      .unwrap()
      .add_source(File::from_str(r#"mode = "staging""#, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize::<ServerConfig>();
    assert!(result.is_err());
  }

  #[test]
  fn node_env_production_switches_default_mode() {
    let cfg: ServerConfig = defaults(Some("production"))
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.mode, Mode::Production);
    assert_eq!(cfg.store_path(), std::env::temp_dir().join("frases.json"));

    assert_eq!(default_mode(Some("development")), "development");
    assert_eq!(default_mode(Some("test")), "development");
    assert_eq!(default_mode(None), "development");
  }

  #[test]
  fn explicit_mode_wins_over_node_env() {
    let cfg: ServerConfig = defaults(Some("production"))
      .unwrap()
      .add_source(File::from_str(r#"mode = "development""#, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.mode, Mode::Development);
  }
}
