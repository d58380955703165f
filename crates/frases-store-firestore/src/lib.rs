//! Firestore backend for Frases.
//!
//! Talks to the Firestore REST API (`v1`) with [`reqwest`]. Each phrase is one
//! document in a collection, keyed by the id Firestore assigns; the creation
//! time is stored as a native `timestampValue`.
//!
//! Production access authenticates with a Google service-account key
//! ([`ServiceAccountKey`]); the local emulator needs no credentials.

mod auth;
mod document;
mod store;

pub mod error;

pub use auth::ServiceAccountKey;
pub use error::{Error, Result};
pub use store::{DEFAULT_COLLECTION, FirestoreStore};
