//! The phrase record and its JSON shape.

use std::fmt;

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize, Serializer};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque phrase identifier.
///
/// The file backend mints a random UUID; the Firestore backend uses the
/// document key assigned by the collection. Callers must not rely on either
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhraseId(String);

impl PhraseId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PhraseId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for PhraseId {
  fn from(id: String) -> Self { Self(id) }
}

impl From<&str> for PhraseId {
  fn from(id: &str) -> Self { Self(id.to_owned()) }
}

// ─── Phrase ──────────────────────────────────────────────────────────────────

/// A submitted phrase.
///
/// Serialises to `{ "id", "texto", "timestamp" }` regardless of backend, with
/// `timestamp` as an ISO-8601 instant in UTC with millisecond precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
  pub id:        PhraseId,
  pub texto:     String,
  /// Set once by the store at creation; never changes afterwards.
  #[serde(serialize_with = "serialize_timestamp")]
  pub timestamp: DateTime<Utc>,
}

/// The current instant at the precision timestamps are serialised with, so a
/// phrase compares equal to itself after a round trip through storage.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }

/// Render a timestamp the way every backend exposes it,
/// e.g. `2024-05-01T18:30:00.123Z`.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_timestamp<S: Serializer>(
  at: &DateTime<Utc>,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(&format_timestamp(at))
}

/// Sort newest first. Ties keep their relative order.
pub fn sort_newest_first(phrases: &mut [Phrase]) {
  phrases.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

// ─── Collection envelope ─────────────────────────────────────────────────────

/// `{ "frases": [...] }`: the body of `GET /frases` and the on-disk layout of
/// the file backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseList {
  #[serde(default)]
  pub frases: Vec<Phrase>,
}

impl From<Vec<Phrase>> for PhraseList {
  fn from(frases: Vec<Phrase>) -> Self { Self { frases } }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;
  use serde_json::json;

  use super::*;

  fn phrase(id: &str, secs: i64) -> Phrase {
    Phrase {
      id:        PhraseId::from(id),
      texto:     "Me encanta bailar toda la noche".into(),
      timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
    }
  }

  #[test]
  fn serialises_with_millisecond_iso_timestamp() {
    let mut p = phrase("abc", 1_714_588_200);
    p.timestamp += chrono::Duration::milliseconds(123);
    let value = serde_json::to_value(&p).unwrap();
    assert_eq!(
      value,
      json!({
        "id": "abc",
        "texto": "Me encanta bailar toda la noche",
        "timestamp": "2024-05-01T18:30:00.123Z",
      })
    );
  }

  #[test]
  fn deserialises_offset_timestamps() {
    let p: Phrase = serde_json::from_value(json!({
      "id": "x",
      "texto": "una frase suficientemente larga",
      "timestamp": "2024-05-01T20:30:00+02:00",
    }))
    .unwrap();
    assert_eq!(format_timestamp(&p.timestamp), "2024-05-01T18:30:00.000Z");
  }

  #[test]
  fn now_survives_a_round_trip() {
    let p = Phrase {
      id:        PhraseId::from("x"),
      texto:     "una frase suficientemente larga".into(),
      timestamp: now(),
    };
    let back: Phrase = serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
    assert_eq!(back, p);
  }

  #[test]
  fn list_envelope_tolerates_missing_field() {
    let list: PhraseList = serde_json::from_str("{}").unwrap();
    assert!(list.frases.is_empty());
  }

  #[test]
  fn sort_puts_newest_first() {
    let mut phrases = vec![phrase("a", 10), phrase("b", 30), phrase("c", 20)];
    sort_newest_first(&mut phrases);
    let ids: Vec<_> = phrases.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["b", "c", "a"]);
  }
}
