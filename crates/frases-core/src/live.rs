//! In-process broadcast of newly created phrases to live viewers.
//!
//! Delivery is at-most-once and fire-and-forget: there is no acknowledgment,
//! and a viewer that subscribes after an event was published never sees it.
//! Viewers are expected to load the full list when they connect and then
//! apply the delta stream.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::phrase::Phrase;

/// Event name used when a phrase is created.
pub const NEW_PHRASE_EVENT: &str = "nueva_frase";

/// Default number of events buffered per subscriber before it starts lagging.
pub const DEFAULT_CAPACITY: usize = 256;

/// A named event carrying a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveEvent {
  pub name:   &'static str,
  pub phrase: Phrase,
}

/// Publish/subscribe handle for the live feed.
///
/// Cloning is cheap; every clone publishes to the same set of subscribers.
#[derive(Debug, Clone)]
pub struct LiveFeed {
  tx: broadcast::Sender<LiveEvent>,
}

impl LiveFeed {
  pub fn new(capacity: usize) -> Self {
    let (tx, _) = broadcast::channel(capacity);
    Self { tx }
  }

  /// Push `phrase` to every current subscriber under `event_name`.
  ///
  /// Returns how many subscribers the event was queued for; `0` when nobody
  /// is listening, which is not an error.
  pub fn publish(&self, event_name: &'static str, phrase: &Phrase) -> usize {
    let event = LiveEvent {
      name:   event_name,
      phrase: phrase.clone(),
    };
    match self.tx.send(event) {
      Ok(receivers) => {
        tracing::debug!(event = event_name, receivers, "evento emitido");
        receivers
      }
      Err(_) => {
        tracing::debug!(event = event_name, "evento sin suscriptores");
        0
      }
    }
  }

  /// Start receiving events published from now on.
  pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
    self.tx.subscribe()
  }

  pub fn subscriber_count(&self) -> usize { self.tx.receiver_count() }
}

impl Default for LiveFeed {
  fn default() -> Self { Self::new(DEFAULT_CAPACITY) }
}
