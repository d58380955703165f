//! JSON API and live feed for Frases.
//!
//! Exposes an axum [`Router`] backed by any [`PhraseStore`]. HTML pages,
//! tracing layers, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = frases_api::api_router(Arc::new(store), LiveFeed::default())
//!   .merge(pages);
//! ```

pub mod error;
pub mod frases;
pub mod live;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use frases_core::{live::LiveFeed, store::PhraseStore};

pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub feed:  LiveFeed,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      feed:  self.feed.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `store`, publishing new phrases to `feed`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, feed: LiveFeed) -> Router<()>
where
  S: PhraseStore + 'static,
{
  Router::new()
    .route("/frases", get(frases::list::<S>))
    .route("/frase", post(frases::create::<S>))
    .route(
      "/frase/{id}",
      put(frases::update::<S>).delete(frases::delete::<S>),
    )
    .route("/live/events", get(live::events::<S>))
    .with_state(ApiState { store, feed })
}

// ─── Integration tests ────────────────────────────────────────────────────────
