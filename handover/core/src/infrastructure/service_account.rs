// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Service Account Authentication
//!
//! Exchanges a Google service-account key for OAuth2 access tokens using the
//! JWT bearer grant.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Attach credentials to Drive API calls
//! - **Integration:** Key file → signed RS256 assertion → token endpoint → bearer token

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::drive::DriveError;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before the provider says they expire.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Source of bearer tokens for Drive API calls
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, DriveError>;
}

/// A fixed, pre-issued bearer token.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, DriveError> {
        Ok(self.0.clone())
    }
}

/// The fields of a service-account key file that authentication needs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub private_key_id: Option<String>,

    pub private_key: String,

    pub client_email: String,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DriveError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DriveError::Credentials(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content).map_err(|e| match e {
            DriveError::Credentials(msg) => {
                DriveError::Credentials(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, DriveError> {
        let key: Self = serde_json::from_str(content)
            .map_err(|e| DriveError::Credentials(format!("Invalid service account key: {}", e)))?;

        if key.key_type != "service_account" {
            return Err(DriveError::Credentials(format!(
                "Expected key type 'service_account', found '{}'",
                key.key_type
            )));
        }

        Ok(key)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Token source backed by a service-account key.
///
/// The access token is reused for the lifetime of the process until it is
/// about to expire.
pub struct ServiceAccountTokenSource {
    client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey, scope: impl Into<String>) -> Result<Self, DriveError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| DriveError::Credentials(format!("Invalid private key: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            key,
            encoding_key,
            scope: scope.into(),
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, DriveError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scope.clone(),
            aud: self.key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| DriveError::Credentials(format!("Failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self) -> Result<CachedToken, DriveError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        debug!(token_uri = %self.key.token_uri, "Requesting access token");

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| DriveError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DriveError::Authentication(format!(
                "Token endpoint returned HTTP {}: {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::Authentication(format!("Failed to parse token response: {}", e)))?;

        let expires_at = Duration::try_seconds(token.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                DriveError::Authentication(format!(
                    "Token endpoint returned an out-of-range expires_in: {}",
                    token.expires_in
                ))
            })?;

        Ok(CachedToken {
            token: token.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, DriveError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(EXPIRY_SKEW_SECS) > Utc::now() {
                return Ok(token.token.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}
