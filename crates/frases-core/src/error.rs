//! Error types for `frases-core`.

use thiserror::Error;

use crate::phrase::PhraseId;

#[derive(Debug, Error)]
pub enum Error {
  /// `texto` was missing or outside the accepted length range.
  #[error("texto inválido: {0}")]
  InvalidInput(String),

  #[error("frase no encontrada: {0}")]
  NotFound(PhraseId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
