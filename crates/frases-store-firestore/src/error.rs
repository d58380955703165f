//! Error type for `frases-store-firestore`.

use std::path::PathBuf;

use frases_core::{phrase::PhraseId, store::StoreError};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("cannot read credentials {path:?}: {source}")]
  Credentials {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed credentials: {0}")]
  CredentialsJson(#[source] serde_json::Error),

  #[error("jwt error: {0}")]
  Jwt(#[from] jsonwebtoken::errors::Error),

  #[error("invalid url: {0}")]
  Url(String),

  /// The API answered with a non-success status.
  #[error("firestore returned {status}: {body}")]
  Status { status: StatusCode, body: String },

  /// A document came back without the fields a phrase needs.
  #[error("malformed document {name}: {reason}")]
  Document { name: String, reason: &'static str },

  #[error("frase no encontrada: {0}")]
  NotFound(PhraseId),
}

impl StoreError for Error {
  fn is_not_found(&self) -> bool { matches!(self, Error::NotFound(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
