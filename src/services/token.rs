//! Bearer credential verification and classification.

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{CallerIdentity, CredentialKind};
use crate::services::jwks::KeyResolver;

const BEARER_PREFIX: &str = "Bearer ";

/// Claims as the identity provider issues them. `aud` stays untyped because
/// providers emit it as either a string or an array.
#[derive(Debug, Deserialize)]
struct ProviderClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    aud: Option<serde_json::Value>,
    #[serde(rename = "cognito:groups", default)]
    groups: Vec<String>,
}

/// Verifies a raw bearer string into a [`CallerIdentity`], or fails without
/// ever returning a partial identity.
pub struct TokenVerifier {
    keys: Arc<dyn KeyResolver>,
    issuer: String,
}

impl TokenVerifier {
    pub fn new(keys: Arc<dyn KeyResolver>, issuer: String) -> Self {
        Self { keys, issuer }
    }

    pub async fn verify(&self, authorization: &str) -> Result<CallerIdentity, AppError> {
        let token = authorization
            .strip_prefix(BEARER_PREFIX)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("missing bearer credential")))?;

        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "unsupported signing algorithm {:?}",
                header.alg
            )));
        }
        let kid = header.kid.ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("credential header carries no key id"))
        })?;

        let key = self.keys.resolve(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        // The provider's access credentials carry `client_id` instead of
        // `aud`; classification below inspects both claims manually.
        validation.validate_aud = false;

        let claims = decode::<ProviderClaims>(token, &key, &validation)?.claims;

        let kind = if claims.client_id.is_some() {
            CredentialKind::Access
        } else if claims.aud.is_some() {
            CredentialKind::Identity
        } else {
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "credential is neither an access nor an identity credential"
            )));
        };

        tracing::debug!(subject = %claims.sub, kind = ?kind, "credential verified");

        Ok(CallerIdentity {
            subject: claims.sub,
            kind,
            email: claims.email,
            groups: claims.groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoKeys;

    #[async_trait]
    impl KeyResolver for NoKeys {
        async fn resolve(&self, _kid: &str) -> Result<jsonwebtoken::DecodingKey, AppError> {
            Err(AppError::KeyResolution(anyhow::anyhow!("no keys")))
        }
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(Arc::new(NoKeys), "https://issuer.example".to_string())
    }

    #[tokio::test]
    async fn rejects_missing_scheme_marker() {
        let err = verifier().verify("token-without-scheme").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn rejects_empty_credential() {
        assert!(verifier().verify("").await.is_err());
        assert!(verifier().verify("Bearer ").await.is_err());
    }

    #[tokio::test]
    async fn rejects_garbage_after_scheme_marker() {
        let err = verifier().verify("Bearer not.a.jwt").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken(_)));
    }
}
