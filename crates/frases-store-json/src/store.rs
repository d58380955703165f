//! [`JsonFileStore`] — the single-document implementation of [`PhraseStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use frases_core::{
  phrase::{self, Phrase, PhraseId, PhraseList, sort_newest_first},
  store::PhraseStore,
  texto::Texto,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A phrase store backed by one JSON file.
///
/// Cloning is cheap; clones share the path. There is no locking between
/// writers: two overlapping read-modify-write cycles resolve as last writer
/// wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  path: Arc<PathBuf>,
}

impl JsonFileStore {
  /// Open the document at `path`, creating its directory and an empty
  /// document if either is missing. Existing content is kept.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self::at(path);
    if let Some(dir) = store.path.parent().filter(|d| !d.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| store.io_error(source))?;
    }
    match tokio::fs::metadata(store.path()).await {
      Ok(_) => {}
      Err(e) if e.kind() == ErrorKind::NotFound => {
        store.write(&PhraseList::default()).await?;
      }
      Err(e) => return Err(store.io_error(e)),
    }
    tracing::debug!(path = ?store.path(), "documento de frases abierto");
    Ok(store)
  }

  /// Start from an empty document at `path`, discarding whatever was there.
  pub async fn create_fresh(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self::at(path);
    store.write(&PhraseList::default()).await?;
    Ok(store)
  }

  fn at(path: impl AsRef<Path>) -> Self {
    Self {
      path: Arc::new(path.as_ref().to_path_buf()),
    }
  }

  pub fn path(&self) -> &Path { &self.path }

  fn io_error(&self, source: std::io::Error) -> Error {
    Error::Io {
      path: self.path.to_path_buf(),
      source,
    }
  }

  /// Load the whole document. A missing file reads as an empty collection.
  async fn read(&self) -> Result<PhraseList> {
    let bytes = match tokio::fs::read(self.path()).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        return Ok(PhraseList::default());
      }
      Err(e) => return Err(self.io_error(e)),
    };
    serde_json::from_slice(&bytes).map_err(|source| Error::Json {
      path: self.path.to_path_buf(),
      source,
    })
  }

  /// Replace the whole document.
  async fn write(&self, list: &PhraseList) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(list).map_err(|source| Error::Json {
      path: self.path.to_path_buf(),
      source,
    })?;
    tokio::fs::write(self.path(), bytes)
      .await
      .map_err(|source| self.io_error(source))
  }
}

// ─── PhraseStore impl ────────────────────────────────────────────────────────

impl PhraseStore for JsonFileStore {
  type Error = Error;

  async fn list(&self) -> Result<Vec<Phrase>> {
    let mut frases = self.read().await?.frases;
    sort_newest_first(&mut frases);
    Ok(frases)
  }

  async fn create(&self, texto: Texto) -> Result<Phrase> {
    let phrase = Phrase {
      id:        PhraseId::new(Uuid::new_v4().to_string()),
      texto:     texto.into_inner(),
      timestamp: phrase::now(),
    };

    let mut doc = self.read().await?;
    doc.frases.insert(0, phrase.clone());
    self.write(&doc).await?;
    Ok(phrase)
  }

  async fn update(&self, id: PhraseId, texto: Texto) -> Result<Phrase> {
    let mut doc = self.read().await?;
    let phrase = doc
      .frases
      .iter_mut()
      .find(|p| p.id == id)
      .ok_or(Error::NotFound(id))?;
    phrase.texto = texto.into_inner();
    let updated = phrase.clone();

    self.write(&doc).await?;
    Ok(updated)
  }

  async fn delete(&self, id: PhraseId) -> Result<()> {
    let mut doc = self.read().await?;
    let index = doc
      .frases
      .iter()
      .position(|p| p.id == id)
      .ok_or(Error::NotFound(id))?;
    doc.frases.remove(index);

    self.write(&doc).await
  }
}
