//! Signing-key resolution against the identity provider's published key set.

use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;

use crate::error::AppError;

/// Supplies a verification key for a credential's `kid` header.
///
/// Injected into the token verifier so tests can swap the network-backed
/// client for a static key set.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AppError>;
}

/// Network-backed resolver over the provider's JWKS endpoint.
///
/// Keys are cached by key-id for the process lifetime; a cache-miss race
/// that fetches the set twice is harmless since entries are immutable and
/// last-write-wins. Construct once per process and share via `Arc`.
pub struct JwksClient {
    http: reqwest::Client,
    jwks_url: String,
    keys: DashMap<String, DecodingKey>,
}

impl JwksClient {
    pub fn new(jwks_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            jwks_url,
            keys: DashMap::new(),
        }
    }

    async fn refresh(&self) -> Result<(), AppError> {
        let jwks: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    self.keys.insert(kid, key);
                }
                Err(err) => {
                    tracing::warn!(kid = %kid, error = %err, "skipping unusable JWK entry");
                }
            }
        }

        tracing::debug!(url = %self.jwks_url, keys = self.keys.len(), "refreshed signing key set");
        Ok(())
    }
}

#[async_trait]
impl KeyResolver for JwksClient {
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AppError> {
        if let Some(key) = self.keys.get(kid) {
            return Ok(key.clone());
        }

        self.refresh().await?;

        self.keys.get(kid).map(|key| key.clone()).ok_or_else(|| {
            AppError::KeyResolution(anyhow::anyhow!(
                "identity provider published no signing key for kid {}",
                kid
            ))
        })
    }
}
