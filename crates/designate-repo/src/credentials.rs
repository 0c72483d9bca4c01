//! GitHub credentials
//!
//! Two strategies behind one trait:
//! - a static token (personal access token, CI token)
//! - a GitHub App, exchanging a signed JWT for an installation token
//!
//! Tokens are opaque to the rest of Designate and never logged.

use std::fmt;

use async_trait::async_trait;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::{RepoError, Result};
use crate::github::{GithubClient, RepoName};

/// Source of a bearer token for the GitHub API
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// A token supplied as-is
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// JWT claims GitHub expects from an app
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppClaims {
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl AppClaims {
    /// Backdated by a minute for clock drift, valid for nine (GitHub caps at ten)
    pub fn new(app_id: u64, now: DateTime<Utc>) -> Self {
        Self {
            iat: (now - Duration::seconds(60)).timestamp(),
            exp: (now + Duration::minutes(9)).timestamp(),
            iss: app_id.to_string(),
        }
    }
}

/// GitHub App installed on the registry repository
pub struct GithubApp {
    client: GithubClient,
    app_id: u64,
    key: EncodingKey,
    repo: RepoName,
}

impl fmt::Debug for GithubApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubApp")
            .field("app_id", &self.app_id)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl GithubApp {
    /// `private_key` is the app's PEM key, either verbatim or base64-encoded
    pub fn new(client: GithubClient, app_id: u64, private_key: &str, repo: RepoName) -> Result<Self> {
        let pem = decode_private_key(private_key)?;
        let key = EncodingKey::from_rsa_pem(&pem)?;
        Ok(Self {
            client,
            app_id,
            key,
            repo,
        })
    }

    /// Signed app JWT valid around `now`
    pub fn jwt(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = AppClaims::new(self.app_id, now);
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }
}

#[async_trait]
impl CredentialProvider for GithubApp {
    async fn token(&self) -> Result<String> {
        let jwt = self.jwt(Utc::now())?;
        let installation = self.client.installation_id(&self.repo, &jwt).await?;
        tracing::debug!(app_id = self.app_id, installation, repo = %self.repo, "requesting installation token");
        self.client.installation_token(installation, &jwt).await
    }
}

fn decode_private_key(private_key: &str) -> Result<Vec<u8>> {
    let trimmed = private_key.trim();
    if trimmed.starts_with("-----BEGIN") {
        return Ok(trimmed.as_bytes().to_vec());
    }

    let compact: String = trimmed.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| RepoError::InvalidPrivateKey {
            message: format!("not PEM and not base64: {}", e),
        })
}
