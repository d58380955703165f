//! Handlers for the phrase endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/frases`     | `{"frases": [...]}`, newest first; storage failures yield an empty list |
//! | `POST`   | `/frase`      | Body `{"texto": "..."}` or `texto=...`; 201 + phrase, broadcast to live viewers |
//! | `PUT`    | `/frase/{id}` | Body `{"texto": "..."}` or `texto=...`; 200 + updated phrase |
//! | `DELETE` | `/frase/{id}` | 204 |

use std::convert::Infallible;

use axum::{
  Form, Json,
  extract::{FromRequest, Path, Request, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use frases_core::{
  live::NEW_PHRASE_EVENT,
  phrase::{Phrase, PhraseId, PhraseList},
  store::{PhraseStore, StoreError as _},
  texto::{self, Texto},
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::{ApiError, Operation},
};

/// Body accepted by `POST /frase` and `PUT /frase/{id}`, either as JSON or as
/// an urlencoded form.
#[derive(Debug, Deserialize)]
pub struct TextoBody {
  pub texto: Option<String>,
}

/// The `texto` field of a write request.
///
/// A body that is missing, unreadable, or has no string `texto` yields
/// `None`, which then fails the same length check as a short text.
#[derive(Debug)]
pub struct TextoInput(pub Option<String>);

impl<S> FromRequest<S> for TextoInput
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let body = if is_form(&req) {
      Form::<TextoBody>::from_request(req, state)
        .await
        .map(|Form(b)| b)
        .map_err(|r| r.body_text())
    } else {
      Json::<TextoBody>::from_request(req, state)
        .await
        .map(|Json(b)| b)
        .map_err(|r| r.body_text())
    };
    match body {
      Ok(b) => Ok(Self(b.texto)),
      Err(reason) => {
        tracing::debug!(%reason, "cuerpo de petición no válido");
        Ok(Self(None))
      }
    }
  }
}

fn is_form(req: &Request) -> bool {
  req
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .and_then(|ct| ct.split(';').next())
    .is_some_and(|mime| {
      mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded")
    })
}

fn parse_texto(TextoInput(texto): TextoInput) -> Result<Texto, ApiError> {
  Ok(texto::validate(texto.as_deref())?)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /frases`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Json<PhraseList>
where
  S: PhraseStore,
{
  Json(PhraseList::from(state.store.list_or_empty().await))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /frase` — returns 201 + the stored [`Phrase`] and pushes it to live
/// viewers.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: TextoInput,
) -> Result<impl IntoResponse, ApiError>
where
  S: PhraseStore,
{
  let texto = parse_texto(body)?;
  let phrase = state
    .store
    .create(texto)
    .await
    .map_err(|e| ApiError::store(Operation::Create, e))?;

  state.feed.publish(NEW_PHRASE_EVENT, &phrase);
  Ok((StatusCode::CREATED, Json(phrase)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /frase/{id}` — live viewers are not notified.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PhraseId>,
  body: TextoInput,
) -> Result<Json<Phrase>, ApiError>
where
  S: PhraseStore,
{
  let texto = parse_texto(body)?;
  let phrase = state
    .store
    .update(id.clone(), texto)
    .await
    .map_err(|e| {
      if e.is_not_found() {
        ApiError::NotFound(id)
      } else {
        ApiError::store(Operation::Update, e)
      }
    })?;
  Ok(Json(phrase))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /frase/{id}` — live viewers are not notified.
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PhraseId>,
) -> Result<StatusCode, ApiError>
where
  S: PhraseStore,
{
  state.store.delete(id.clone()).await.map_err(|e| {
    if e.is_not_found() {
      ApiError::NotFound(id)
    } else {
      ApiError::store(Operation::Delete, e)
    }
  })?;
  Ok(StatusCode::NO_CONTENT)
}
