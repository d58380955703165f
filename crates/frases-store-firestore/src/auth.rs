//! Service-account authentication (OAuth 2.0 JWT bearer grant).
//!
//! A signed RS256 assertion is exchanged at the key's `token_uri` for a
//! short-lived access token, which is cached until shortly before it expires.

use std::{fmt, path::Path};

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{Error, Result};

/// OAuth scope granting Firestore read/write access.
pub(crate) const DATASTORE_SCOPE: &str =
  "https://www.googleapis.com/auth/datastore";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME: i64 = 3600;
/// Refresh this many seconds before the cached token expires.
const REFRESH_MARGIN_SECS: i64 = 60;

// ─── Key file ────────────────────────────────────────────────────────────────

/// The fields of a Google service-account JSON key that the store uses.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
  pub project_id:   String,
  pub client_email: String,
  pub private_key:  String,
  #[serde(default = "default_token_uri")]
  pub token_uri:    String,
}

fn default_token_uri() -> String { DEFAULT_TOKEN_URI.to_string() }

impl ServiceAccountKey {
  /// Read a key from a JSON file as downloaded from the Google Cloud console.
  pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = tokio::fs::read(path)
      .await
      .map_err(|source| Error::Credentials {
        path: path.to_path_buf(),
        source,
      })?;
    Self::from_json(&raw)
  }

  pub fn from_json(raw: &[u8]) -> Result<Self> {
    serde_json::from_slice(raw).map_err(Error::CredentialsJson)
  }
}

impl fmt::Debug for ServiceAccountKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServiceAccountKey")
      .field("project_id", &self.project_id)
      .field("client_email", &self.client_email)
      .field("private_key", &"<redacted>")
      .field("token_uri", &self.token_uri)
      .finish()
  }
}

// ─── Token source ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Claims<'a> {
  iss:   &'a str,
  scope: &'a str,
  aud:   &'a str,
  iat:   i64,
  exp:   i64,
}

#[derive(Deserialize)]
struct TokenResponse {
  access_token: String,
  expires_in:   i64,
}

struct CachedToken {
  value:      String,
  expires_at: DateTime<Utc>,
}

/// Mints and caches access tokens for one service account.
pub(crate) struct TokenSource {
  key:          ServiceAccountKey,
  encoding_key: EncodingKey,
  cached:       Mutex<Option<CachedToken>>,
}

impl TokenSource {
  /// Fails early if the private key is not a valid RSA PEM.
  pub(crate) fn new(key: ServiceAccountKey) -> Result<Self> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(Self {
      key,
      encoding_key,
      cached: Mutex::new(None),
    })
  }

  /// A valid access token, fetching a new one when the cache is empty or
  /// about to expire.
  pub(crate) async fn token(&self, client: &Client) -> Result<String> {
    let mut cached = self.cached.lock().await;
    let now = Utc::now();
    if let Some(token) = cached.as_ref()
      && token.expires_at - chrono::Duration::seconds(REFRESH_MARGIN_SECS) > now
    {
      return Ok(token.value.clone());
    }

    let assertion = self.assertion(now)?;
    let resp = client
      .post(&self.key.token_uri)
      .form(&[
        ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
        ("assertion", assertion.as_str()),
      ])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status, body });
    }
    let issued: TokenResponse = resp.json().await?;
    tracing::debug!(expires_in = issued.expires_in, "token de acceso obtenido");

    let token = CachedToken {
      value:      issued.access_token,
      expires_at: now + chrono::Duration::seconds(issued.expires_in),
    };
    let value = token.value.clone();
    *cached = Some(token);
    Ok(value)
  }

  fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
    let iat = now.timestamp();
    let claims = Claims {
      iss:   &self.key.client_email,
      scope: DATASTORE_SCOPE,
      aud:   &self.key.token_uri,
      iat,
      exp:   iat + ASSERTION_LIFETIME,
    };
    Ok(jsonwebtoken::encode(
      &Header::new(Algorithm::RS256),
      &claims,
      &self.encoding_key,
    )?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TEST_KEY_PEM: &str = include_str!("testdata/test_rsa_key.pem");

  fn key() -> ServiceAccountKey {
    ServiceAccountKey {
      project_id:   "demo".into(),
      client_email: "frases@demo.iam.gserviceaccount.com".into(),
      private_key:  TEST_KEY_PEM.into(),
      token_uri:    DEFAULT_TOKEN_URI.into(),
    }
  }

  #[test]
  fn key_file_defaults_token_uri() {
    let key = ServiceAccountKey::from_json(
      br#"{"type":"service_account","project_id":"demo",
           "client_email":"a@b.c","private_key":"pem"}"#,
    )
    .unwrap();
    assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
    assert_eq!(key.project_id, "demo");
  }

  #[test]
  fn debug_redacts_private_key() {
    let rendered = format!("{:?}", key());
    assert!(!rendered.contains("PRIVATE KEY"));
    assert!(rendered.contains("<redacted>"));
  }

  #[test]
  fn rejects_invalid_pem() {
    let mut bad = key();
    bad.private_key = "not a key".into();
    assert!(matches!(TokenSource::new(bad), Err(Error::Jwt(_))));
  }

  #[test]
  fn assertion_is_a_three_part_jwt() {
    let source = TokenSource::new(key()).unwrap();
    let jwt = source.assertion(Utc::now()).unwrap();
    assert_eq!(jwt.split('.').count(), 3);
  }
}
