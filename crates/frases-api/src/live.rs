//! `GET /live/events` — server-sent events for the live feed.
//!
//! Each created phrase arrives as
//!
//! ```text
//! event: nueva_frase
//! data: {"id":"...","texto":"...","timestamp":"..."}
//! ```
//!
//! The stream only carries phrases created after the connection opened;
//! clients load `GET /frases` first and prepend what arrives here.

use axum::{
  extract::State,
  response::sse::{Event, KeepAlive, Sse},
};
use frases_core::store::PhraseStore;
use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;

use crate::ApiState;

/// `GET /live/events`
pub async fn events<S>(
  State(state): State<ApiState<S>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>>
where
  S: PhraseStore,
{
  let rx = state.feed.subscribe();
  tracing::debug!(
    subscribers = state.feed.subscriber_count(),
    "espectador conectado al feed en vivo"
  );

  let stream = stream::unfold(rx, |mut rx| async move {
    loop {
      match rx.recv().await {
        Ok(event) => {
          let sse = Event::default().event(event.name).json_data(&event.phrase);
          return Some((sse, rx));
        }
        Err(RecvError::Lagged(skipped)) => {
          tracing::warn!(skipped, "espectador retrasado, eventos descartados");
        }
        Err(RecvError::Closed) => return None,
      }
    }
  });

  Sse::new(stream).keep_alive(KeepAlive::default())
}
