//! The `PhraseStore` trait.
//!
//! Implemented by storage backends (`frases-store-json`,
//! `frases-store-firestore`). The API layer depends on this abstraction, never
//! on a concrete backend.

use std::future::Future;

use crate::{
  phrase::{Phrase, PhraseId},
  texto::Texto,
};

/// Behaviour every backend error type must expose to the handler layer.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when the operation failed because the addressed phrase does not
  /// exist.
  fn is_not_found(&self) -> bool;
}

/// Abstraction over a phrase store backend.
///
/// Both backends honour the same contract: `list` is ordered newest first,
/// writes are persisted before the returned future resolves, and `update` /
/// `delete` on an unknown id fail with an error whose
/// [`StoreError::is_not_found`] is `true`, leaving the collection untouched.
pub trait PhraseStore: Send + Sync {
  type Error: StoreError;

  /// All phrases, ordered by `timestamp` descending.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<Phrase>, Self::Error>> + Send + '_;

  /// Persist a new phrase. The store assigns `id` and `timestamp`.
  fn create(
    &self,
    texto: Texto,
  ) -> impl Future<Output = Result<Phrase, Self::Error>> + Send + '_;

  /// Replace the text of an existing phrase; `id` and `timestamp` are kept.
  fn update(
    &self,
    id: PhraseId,
    texto: Texto,
  ) -> impl Future<Output = Result<Phrase, Self::Error>> + Send + '_;

  /// Remove a phrase.
  fn delete(
    &self,
    id: PhraseId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The fail-soft read path: like [`list`](Self::list), but a storage
  /// failure is logged and reported as an empty collection.
  fn list_or_empty(&self) -> impl Future<Output = Vec<Phrase>> + Send + '_ {
    async move {
      match self.list().await {
        Ok(phrases) => phrases,
        Err(e) => {
          tracing::error!(error = %e, "Error al leer frases");
          Vec::new()
        }
      }
    }
  }
}
