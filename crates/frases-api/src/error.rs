//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Clients only ever see `{"error": "<generic message>"}`; the underlying
//! cause is logged server-side.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use frases_core::phrase::PhraseId;
use serde_json::json;
use thiserror::Error;

/// The write operation a storage failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Create,
  Update,
  Delete,
}

impl Operation {
  /// Server-side log message.
  fn diagnostic(self) -> &'static str {
    match self {
      Operation::Create => "Error al guardar frase",
      Operation::Update => "Error al actualizar frase",
      Operation::Delete => "Error al eliminar frase",
    }
  }

  /// Message returned to the client.
  fn public_message(self) -> &'static str {
    match self {
      Operation::Create => "Error al guardar la frase",
      Operation::Update => "Error al actualizar la frase",
      Operation::Delete => "Error al eliminar la frase",
    }
  }
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("texto inválido: {0}")]
  InvalidInput(String),

  #[error("frase no encontrada: {0}")]
  NotFound(PhraseId),

  #[error("{op}: {source}", op = .operation.diagnostic())]
  Store {
    operation: Operation,
    #[source]
    source:    Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn store(
    operation: Operation,
    source: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    ApiError::Store {
      operation,
      source: Box::new(source),
    }
  }
}

impl From<frases_core::Error> for ApiError {
  fn from(e: frases_core::Error) -> Self {
    match e {
      frases_core::Error::InvalidInput(reason) => ApiError::InvalidInput(reason),
      frases_core::Error::NotFound(id) => ApiError::NotFound(id),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::InvalidInput(reason) => {
        tracing::debug!(%reason, "texto rechazado");
        (StatusCode::BAD_REQUEST, "Texto inválido")
      }
      ApiError::NotFound(id) => {
        tracing::debug!(%id, "frase no encontrada");
        (StatusCode::NOT_FOUND, "Frase no encontrada")
      }
      ApiError::Store { operation, source } => {
        tracing::error!(error = %source, "{}", operation.diagnostic());
        (StatusCode::INTERNAL_SERVER_ERROR, operation.public_message())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
