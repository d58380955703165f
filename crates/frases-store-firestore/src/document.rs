//! Firestore REST document encoding for phrases.
//!
//! Only the two value kinds a phrase uses are modelled; other keys in a value
//! object are ignored.

use chrono::{DateTime, Utc};
use frases_core::phrase::{Phrase, PhraseId};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub(crate) const TEXTO_FIELD: &str = "texto";
pub(crate) const TIMESTAMP_FIELD: &str = "timestamp";

/// A Firestore `Value`, restricted to strings and timestamps.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Value {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub string_value:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timestamp_value: Option<DateTime<Utc>>,
}

impl Value {
  pub fn string(s: impl Into<String>) -> Self {
    Self {
      string_value: Some(s.into()),
      ..Self::default()
    }
  }

  pub fn timestamp(at: DateTime<Utc>) -> Self {
    Self {
      timestamp_value: Some(at),
      ..Self::default()
    }
  }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Fields {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub texto:     Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<Value>,
}

/// Request body for create and patch calls.
#[derive(Debug, Serialize)]
pub(crate) struct WriteBody {
  pub fields: Fields,
}

/// A document as returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct Document {
  /// `projects/{p}/databases/(default)/documents/{collection}/{id}`
  pub name:   String,
  #[serde(default)]
  pub fields: Fields,
}

/// One element of a `runQuery` response stream. Elements without a document
/// only carry progress metadata.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryItem {
  pub document: Option<Document>,
}

impl Document {
  /// The collection-assigned key: the last segment of `name`.
  pub fn id(&self) -> &str {
    self.name.rsplit('/').next().unwrap_or_default()
  }

  pub fn into_phrase(self) -> Result<Phrase> {
    let id = self.id().to_owned();
    if id.is_empty() {
      return Err(self.malformed("empty document id"));
    }
    let Some(texto) = self.fields.texto.as_ref().and_then(|v| v.string_value.clone())
    else {
      return Err(self.malformed("missing string field `texto`"));
    };
    let Some(timestamp) = self.fields.timestamp.as_ref().and_then(|v| v.timestamp_value)
    else {
      return Err(self.malformed("missing timestamp field `timestamp`"));
    };
    Ok(Phrase {
      id: PhraseId::new(id),
      texto,
      timestamp,
    })
  }

  fn malformed(&self, reason: &'static str) -> Error {
    Error::Document {
      name: self.name.clone(),
      reason,
    }
  }
}

#[cfg(test)]
mod tests {
  use frases_core::phrase::format_timestamp;
  use serde_json::json;

  use super::*;

  #[test]
  fn decodes_document_into_phrase() {
    let doc: Document = serde_json::from_value(json!({
      "name": "projects/demo/databases/(default)/documents/frases/AbC123",
      "fields": {
        "texto": { "stringValue": "Me encanta bailar toda la noche" },
        "timestamp": { "timestampValue": "2024-05-01T18:30:00.123456Z" }
      },
      "createTime": "2024-05-01T18:30:00.200000Z",
      "updateTime": "2024-05-01T18:30:00.200000Z"
    }))
    .unwrap();

    let phrase = doc.into_phrase().unwrap();
    assert_eq!(phrase.id.as_str(), "AbC123");
    assert_eq!(phrase.texto, "Me encanta bailar toda la noche");
    assert_eq!(format_timestamp(&phrase.timestamp), "2024-05-01T18:30:00.123Z");
  }

  #[test]
  fn rejects_documents_without_timestamp() {
    let doc: Document = serde_json::from_value(json!({
      "name": "projects/demo/databases/(default)/documents/frases/x",
      "fields": { "texto": { "stringValue": "texto sin fecha alguna" } }
    }))
    .unwrap();
    assert!(matches!(doc.into_phrase(), Err(Error::Document { .. })));
  }

  #[test]
  fn rejects_non_string_texto() {
    let doc: Document = serde_json::from_value(json!({
      "name": "projects/demo/databases/(default)/documents/frases/x",
      "fields": {
        "texto": { "integerValue": "12" },
        "timestamp": { "timestampValue": "2024-05-01T18:30:00Z" }
      }
    }))
    .unwrap();
    assert!(matches!(doc.into_phrase(), Err(Error::Document { .. })));
  }

  #[test]
  fn write_body_uses_native_value_kinds() {
    let body = WriteBody {
      fields: Fields {
        texto:     Some(Value::string("hola a todo el mundo")),
        timestamp: None,
      },
    };
    assert_eq!(
      serde_json::to_value(&body).unwrap(),
      json!({ "fields": { "texto": { "stringValue": "hola a todo el mundo" } } })
    );
  }
}
