//! [`FirestoreStore`] — the document-collection implementation of
//! [`PhraseStore`].

use std::{sync::Arc, time::Duration};

use frases_core::{
  phrase::{self, Phrase, PhraseId},
  store::PhraseStore,
  texto::Texto,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde_json::json;

use crate::{
  Error, Result, ServiceAccountKey,
  auth::TokenSource,
  document::{Document, Fields, QueryItem, TEXTO_FIELD, TIMESTAMP_FIELD, Value, WriteBody},
};

/// Production API root.
const FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "frases";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A phrase store backed by a Firestore collection.
///
/// Cloning is cheap. The HTTP client and token cache are shared.
#[derive(Clone)]
pub struct FirestoreStore {
  client:     Client,
  /// `.../v1/projects/{project}/databases/(default)/documents`
  documents:  Url,
  collection: String,
  /// `None` when talking to the emulator.
  tokens:     Option<Arc<TokenSource>>,
}

impl FirestoreStore {
  /// Connect to production Firestore with a service-account key.
  ///
  /// `project_id` overrides the project named in the key.
  pub fn new(
    key: ServiceAccountKey,
    project_id: Option<String>,
    collection: impl Into<String>,
  ) -> Result<Self> {
    let project = project_id.unwrap_or_else(|| key.project_id.clone());
    let tokens = TokenSource::new(key)?;
    Self::build(FIRESTORE_URL, &project, collection.into(), Some(Arc::new(tokens)))
  }

  /// Connect to an unauthenticated endpoint such as the Firestore emulator.
  ///
  /// `base_url` is the scheme and authority, e.g. `http://localhost:8080`.
  pub fn emulator(
    base_url: &str,
    project_id: &str,
    collection: impl Into<String>,
  ) -> Result<Self> {
    Self::build(base_url, project_id, collection.into(), None)
  }

  pub(crate) fn build(
    base_url: &str,
    project_id: &str,
    collection: String,
    tokens: Option<Arc<TokenSource>>,
  ) -> Result<Self> {
    let documents = Url::parse(&format!(
      "{}/v1/projects/{project_id}/databases/(default)/documents",
      base_url.trim_end_matches('/')
    ))
    .map_err(|e| Error::Url(e.to_string()))?;
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(Self {
      client,
      documents,
      collection,
      tokens,
    })
  }

  pub fn collection(&self) -> &str { &self.collection }

  // ── URLs ──────────────────────────────────────────────────────────────────

  fn url_with_segments(&self, extra: &[&str]) -> Result<Url> {
    let mut url = self.documents.clone();
    url
      .path_segments_mut()
      .map_err(|()| Error::Url(self.documents.to_string()))?
      .extend(extra);
    Ok(url)
  }

  fn collection_url(&self) -> Result<Url> {
    self.url_with_segments(&[self.collection.as_str()])
  }

  /// URL of a single document, with an existence precondition. Ids that
  /// cannot name a document in this collection are reported as not found.
  fn document_url(&self, id: &PhraseId) -> Result<Url> {
    let raw = id.as_str();
    if raw.is_empty() || raw.contains('/') {
      return Err(Error::NotFound(id.clone()));
    }
    let mut url = self.url_with_segments(&[self.collection.as_str(), raw])?;
    url
      .query_pairs_mut()
      .append_pair("currentDocument.exists", "true");
    Ok(url)
  }

  fn run_query_url(&self) -> Result<Url> {
    Url::parse(&format!("{}:runQuery", self.documents))
      .map_err(|e| Error::Url(e.to_string()))
  }

  // ── Transport ─────────────────────────────────────────────────────────────

  async fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder> {
    match &self.tokens {
      Some(tokens) => Ok(req.bearer_auth(tokens.token(&self.client).await?)),
      None => Ok(req),
    }
  }

  /// Send `req`; a 404 becomes [`Error::NotFound`] for `id` when given.
  async fn send(
    &self,
    req: RequestBuilder,
    id: Option<&PhraseId>,
  ) -> Result<Response> {
    let resp = self.authorize(req).await?.send().await?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND
      && let Some(id) = id
    {
      return Err(Error::NotFound(id.clone()));
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Status { status, body })
  }
}

// ─── PhraseStore impl ────────────────────────────────────────────────────────

impl PhraseStore for FirestoreStore {
  type Error = Error;

  async fn list(&self) -> Result<Vec<Phrase>> {
    let query = json!({
      "structuredQuery": {
        "from": [{ "collectionId": self.collection }],
        "orderBy": [{
          "field": { "fieldPath": TIMESTAMP_FIELD },
          "direction": "DESCENDING",
        }],
      }
    });
    let req = self.client.post(self.run_query_url()?).json(&query);
    let items: Vec<QueryItem> = self.send(req, None).await?.json().await?;

    let mut phrases = Vec::with_capacity(items.len());
    for doc in items.into_iter().filter_map(|item| item.document) {
      match doc.into_phrase() {
        Ok(p) => phrases.push(p),
        Err(e) => tracing::warn!(error = %e, "documento ignorado"),
      }
    }
    Ok(phrases)
  }

  async fn create(&self, texto: Texto) -> Result<Phrase> {
    let body = WriteBody {
      fields: Fields {
        texto:     Some(Value::string(texto.into_inner())),
        timestamp: Some(Value::timestamp(phrase::now())),
      },
    };
    let req = self.client.post(self.collection_url()?).json(&body);
    let doc: Document = self.send(req, None).await?.json().await?;
    doc.into_phrase()
  }

  async fn update(&self, id: PhraseId, texto: Texto) -> Result<Phrase> {
    let mut url = self.document_url(&id)?;
    url
      .query_pairs_mut()
      .append_pair("updateMask.fieldPaths", TEXTO_FIELD);
    let body = WriteBody {
      fields: Fields {
        texto:     Some(Value::string(texto.into_inner())),
        timestamp: None,
      },
    };
    let req = self.client.patch(url).json(&body);
    let doc: Document = self.send(req, Some(&id)).await?.json().await?;
    doc.into_phrase()
  }

  async fn delete(&self, id: PhraseId) -> Result<()> {
    let req = self.client.delete(self.document_url(&id)?);
    self.send(req, Some(&id)).await?;
    Ok(())
  }
}
