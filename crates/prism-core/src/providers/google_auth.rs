//! OAuth2 access tokens for a Google service account.
//!
//! A signed RS256 assertion is exchanged at the key's `token_uri` for a
//! bearer token, which is cached until shortly before it expires.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::credentials::ServiceAccountKey;
use crate::error::{ProviderError, ProviderErrorKind};

const VISION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-vision";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Mints and caches bearer tokens for one service account.
pub struct ServiceAccountTokens {
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    key: EncodingKey,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokens {
    /// Fails if the private key is not an RSA PEM key.
    pub fn new(key: &ServiceAccountKey) -> Result<Self, jsonwebtoken::errors::Error> {
        Ok(Self {
            client_email: key.client_email.clone(),
            key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            key: EncodingKey::from_rsa_pem(key.private_key.as_bytes())?,
            client: reqwest::Client::new(),
            cached: Mutex::new(None),
        })
    }

    /// Signed JWT assertion issued at `now` (seconds since the epoch).
    pub(crate) fn assertion(&self, now: u64) -> Result<String, ProviderError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: VISION_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&header, &claims, &self.key).map_err(|e| {
            ProviderError::new(
                ProviderErrorKind::Auth,
                format!("Cannot sign service-account assertion: {e}"),
            )
        })
    }

    /// Current bearer token, fetching a new one when the cache is stale.
    pub async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + REFRESH_MARGIN {
                return Ok(token.value.clone());
            }
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let assertion = self.assertion(now)?;

        tracing::debug!("Requesting access token for {}", self.client_email);
        let resp = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| {
                ProviderError::new(
                    ProviderErrorKind::Network,
                    format!("Token request failed: {e}"),
                )
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            ProviderError::new(
                ProviderErrorKind::Network,
                format!("Failed to read token response: {e}"),
            )
        })?;
        if !status.is_success() {
            let mut err = ProviderError::from_status(status.as_u16(), &text);
            if status.is_client_error() && status.as_u16() != 429 {
                err.kind = ProviderErrorKind::Auth;
            }
            return Err(err);
        }

        let token: TokenResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::new(
                ProviderErrorKind::MalformedResponse,
                format!("Failed to parse token response: {e}"),
            )
        })?;
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(token.access_token)
    }
}
