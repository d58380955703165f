//! Core types for the Frases phrase board: the phrase record, text
//! validation, the storage trait and the live feed.
//!
//! Nothing here knows about HTTP or a particular backend. Backends implement
//! [`store::PhraseStore`] and the API layer is generic over it.

pub mod error;
pub mod live;
pub mod phrase;
pub mod store;
pub mod texto;

pub use error::{Error, Result};
