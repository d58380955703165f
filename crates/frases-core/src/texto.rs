//! Validation of phrase text.

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// Minimum accepted length, inclusive.
pub const MIN_LEN: usize = 10;
/// Maximum accepted length, inclusive.
pub const MAX_LEN: usize = 500;

/// Phrase text that has passed [`validate`].
///
/// Stores only accept a `Texto`, so unchecked text never reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Texto(String);

impl Texto {
  /// Validate `texto` and wrap it. Length is counted in UTF-16 code units,
  /// the unit browsers use for `minlength`/`maxlength` on the form.
  pub fn new(texto: impl Into<String>) -> Result<Self> {
    let texto = texto.into();
    let len = texto.encode_utf16().count();
    if len < MIN_LEN {
      return Err(Error::InvalidInput(format!(
        "{len} caracteres, mínimo {MIN_LEN}"
      )));
    }
    if len > MAX_LEN {
      return Err(Error::InvalidInput(format!(
        "{len} caracteres, máximo {MAX_LEN}"
      )));
    }
    Ok(Self(texto))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for Texto {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Check a possibly-absent `texto` field from a request body.
pub fn validate(texto: Option<&str>) -> Result<Texto> {
  match texto {
    Some(t) => Texto::new(t),
    None => Err(Error::InvalidInput("falta el texto".to_string())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_bounds_inclusive() {
    assert!(validate(Some(&"a".repeat(MIN_LEN))).is_ok());
    assert!(validate(Some(&"a".repeat(MAX_LEN))).is_ok());
  }

  #[test]
  fn rejects_out_of_range() {
    assert!(matches!(
      validate(Some(&"a".repeat(MIN_LEN - 1))),
      Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
      validate(Some(&"a".repeat(MAX_LEN + 1))),
      Err(Error::InvalidInput(_))
    ));
    assert!(matches!(validate(Some("short")), Err(Error::InvalidInput(_))));
    assert!(matches!(validate(Some("")), Err(Error::InvalidInput(_))));
  }

  #[test]
  fn rejects_missing() {
    assert!(matches!(validate(None), Err(Error::InvalidInput(_))));
  }

  #[test]
  fn counts_utf16_units_not_bytes() {
    // Ten characters, twenty bytes.
    let accented = "ñ".repeat(10);
    assert_eq!(accented.len(), 20);
    assert!(Texto::new(accented).is_ok());

    // 500 characters but 1000 bytes.
    assert!(Texto::new("é".repeat(MAX_LEN)).is_ok());
  }

  #[test]
  fn astral_characters_count_twice() {
    // Five emoji are ten UTF-16 units.
    assert!(Texto::new("😀".repeat(5)).is_ok());
    assert!(Texto::new("😀".repeat(4)).is_err());

    // 250 emoji fill the limit exactly; 300 exceed it.
    assert!(Texto::new("😀".repeat(MAX_LEN / 2)).is_ok());
    assert!(matches!(
      Texto::new("😀".repeat(300)),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn keeps_text_verbatim() {
    let t = Texto::new("  Me encanta bailar  ").unwrap();
    assert_eq!(t.as_str(), "  Me encanta bailar  ");
  }
}
