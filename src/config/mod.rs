use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AuthorizerConfig {
    pub http: HttpConfig,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub identity: IdentityProviderConfig,
    pub tenancy: TenancyConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl HttpConfig {
    fn load() -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

/// Identity provider endpoints are derived from region and pool id rather
/// than configured directly, so issuer and JWKS URL can never disagree.
#[derive(Debug, Clone)]
pub struct IdentityProviderConfig {
    pub region: String,
    pub user_pool_id: String,
}

impl IdentityProviderConfig {
    /// Expected `iss` claim of every accepted credential.
    pub fn issuer(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }

    /// Published key-set endpoint for signature verification keys.
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer())
    }
}

#[derive(Debug, Clone)]
pub struct TenancyConfig {
    /// Root domain of the platform itself; requests to the bare platform
    /// domain never resolve a tenant from the host header.
    pub platform_domain: String,
    /// Client-set header that overrides every other tenant extraction
    /// strategy.
    pub tenant_header: String,
}

impl TenancyConfig {
    /// First label of the platform domain, e.g. `example` for `example.com`.
    pub fn platform_label(&self) -> &str {
        self.platform_domain.split('.').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl AuthorizerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = AuthorizerConfig {
            http: HttpConfig::load()?,
            environment,
            service_name: get_env("SERVICE_NAME", Some("tenant-authorizer"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            identity: IdentityProviderConfig {
                region: get_env("AWS_REGION", Some("eu-central-1"), is_prod)?,
                user_pool_id: get_env("USER_POOL_ID", None, is_prod)?,
            },
            tenancy: TenancyConfig {
                platform_domain: get_env("PLATFORM_DOMAIN", Some("example.com"), is_prod)?,
                tenant_header: get_env("TENANT_HEADER", Some("X-Tenant-Id"), is_prod)?,
            },
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", None, is_prod)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.http.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.identity.user_pool_id.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "USER_POOL_ID must not be empty"
            )));
        }

        if self.tenancy.platform_label().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PLATFORM_DOMAIN must carry at least one domain label"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issuer_and_jwks_url_share_one_root() {
        let identity = IdentityProviderConfig {
            region: "eu-central-1".to_string(),
            user_pool_id: "eu-central-1_AbCdEf".to_string(),
        };

        assert_eq!(
            identity.issuer(),
            "https://cognito-idp.eu-central-1.amazonaws.com/eu-central-1_AbCdEf"
        );
        assert_eq!(
            identity.jwks_url(),
            "https://cognito-idp.eu-central-1.amazonaws.com/eu-central-1_AbCdEf/.well-known/jwks.json"
        );
    }

    #[test]
    fn platform_label_is_first_domain_label() {
        let tenancy = TenancyConfig {
            platform_domain: "example.com".to_string(),
            tenant_header: "X-Tenant-Id".to_string(),
        };
        assert_eq!(tenancy.platform_label(), "example");
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Prod);
        assert!("staging".parse::<Environment>().is_err());
    }
}
