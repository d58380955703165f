//! HTTP server for Frases: configuration, backend selection, and the full
//! application router (HTML pages + JSON API + live feed).

pub mod config;
pub mod pages;

use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use frases_core::{live::LiveFeed, store::PhraseStore};
use frases_store_firestore::{FirestoreStore, ServiceAccountKey};
use frases_store_json::JsonFileStore;
use tower_http::trace::TraceLayer;

use crate::config::{FirestoreSettings, Mode, ServerConfig};

/// Project id used against the emulator when none is configured.
const EMULATOR_PROJECT: &str = "demo-frases";

/// Build the complete application router for `store`.
pub fn app<S>(store: Arc<S>, feed: LiveFeed) -> Router
where
  S: PhraseStore + 'static,
{
  pages::router()
    .merge(frases_api::api_router(store, feed))
    .layer(TraceLayer::new_for_http())
}

/// Open the file backend at the location `cfg.mode` selects.
pub async fn open_file_store(cfg: &ServerConfig) -> anyhow::Result<JsonFileStore> {
  let path = cfg.store_path();
  let store = match cfg.mode {
    Mode::Production => JsonFileStore::create_fresh(&path).await,
    Mode::Development => JsonFileStore::open(&path).await,
  }
  .with_context(|| format!("failed to initialise store at {path:?}"))?;
  tracing::info!(path = ?store.path(), "Almacenamiento inicializado correctamente");
  Ok(store)
}

/// Open the Firestore backend, against the emulator when one is configured.
pub async fn open_firestore_store(
  settings: &FirestoreSettings,
) -> anyhow::Result<FirestoreStore> {
  if let Some(host) = settings.emulator_host() {
    let project = settings.project_id.as_deref().unwrap_or(EMULATOR_PROJECT);
    let store = FirestoreStore::emulator(
      &format!("http://{host}"),
      project,
      settings.collection.clone(),
    )
    .context("failed to configure Firestore emulator client")?;
    tracing::info!(%host, project, "usando el emulador de Firestore");
    return Ok(store);
  }

  let path = settings.credentials_path().context(
    "Firestore needs a service-account key: set firestore.credentials_path \
     or GOOGLE_APPLICATION_CREDENTIALS",
  )?;
  let key = ServiceAccountKey::from_file(&path)
    .await
    .with_context(|| format!("failed to load credentials from {path:?}"))?;
  let store = FirestoreStore::new(
    key,
    settings.project_id.clone(),
    settings.collection.clone(),
  )
  .context("failed to configure Firestore client")?;
  tracing::info!(collection = store.collection(), "Almacenamiento inicializado correctamente");
  Ok(store)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use std::path::PathBuf;
  use tower::ServiceExt as _;

  use crate::config::{Backend, FirestoreSettings};

  async fn test_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("frases.json")).await.unwrap();
    (dir, app(Arc::new(store), LiveFeed::default()))
  }

  async fn get(app: Router, uri: &str) -> (StatusCode, String, String) {
    let resp = app
      .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let ct = resp
      .headers()
      .get(header::CONTENT_TYPE)
      .map(|v| v.to_str().unwrap().to_string())
      .unwrap_or_default();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, ct, String::from_utf8(bytes.to_vec()).unwrap())
  }

  #[tokio::test]
  async fn pages_are_served_as_html() {
    let (_dir, app) = test_app().await;
    for (uri, marker) in [
      ("/", "id=\"fraseForm\""),
      ("/live", "/live/events"),
      ("/admin", "frases-container"),
    ] {
      let (status, ct, body) = get(app.clone(), uri).await;
      assert_eq!(status, StatusCode::OK, "{uri}");
      assert!(ct.starts_with("text/html"), "{uri}: {ct}");
      assert!(body.contains(marker), "{uri} lacks {marker}");
    }
  }

  #[tokio::test]
  async fn api_is_mounted_alongside_pages() {
    let (_dir, app) = test_app().await;
    let (status, ct, body) = get(app, "/frases").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.starts_with("application/json"));
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value, serde_json::json!({ "frases": [] }));
  }

  #[tokio::test]
  async fn unknown_paths_are_404() {
    let (_dir, app) = test_app().await;
    let (status, _, _) = get(app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn development_file_store_is_created_under_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig {
      host:      "127.0.0.1".into(),
      port:      0,
      mode:      Mode::Development,
      backend:   Backend::File,
      data_dir:  Some(dir.path().join("nested")),
      firestore: FirestoreSettings::default(),
    };
    let store = open_file_store(&cfg).await.unwrap();
    assert_eq!(store.path(), dir.path().join("nested").join("frases.json"));
    assert!(store.path().exists());
  }

  #[tokio::test]
  async fn firestore_without_credentials_fails_fast() {
    let settings = FirestoreSettings {
      credentials_path: Some(PathBuf::from("/definitely/missing/key.json")),
      emulator_host: Some(String::new()),
      ..FirestoreSettings::default()
    };
    // An empty emulator host counts as unset, so the key file is required.
    assert!(open_firestore_store(&settings).await.is_err());
  }

  #[tokio::test]
  async fn firestore_emulator_needs_no_credentials() {
    let settings = FirestoreSettings {
      project_id: Some("demo".into()),
      emulator_host: Some("localhost:8081".into()),
      ..FirestoreSettings::default()
    };
    let store = open_firestore_store(&settings).await.unwrap();
    assert_eq!(store.collection(), "frases");
  }
}
