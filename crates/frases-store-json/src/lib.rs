//! File-backed store for Frases.
//!
//! The whole collection lives in a single JSON document of the form
//! `{ "frases": [...] }`. Every mutation reads the document, edits it in
//! memory and rewrites it in full.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonFileStore;
