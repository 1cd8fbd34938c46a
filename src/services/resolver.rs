//! Tenant extraction and alias resolution.

use std::sync::Arc;

use crate::config::TenancyConfig;
use crate::dtos::AuthorizeRequest;
use crate::models::{TenantRef, PLATFORM_TENANT, WWW_ALIAS};
use crate::services::directory::TenantDirectory;
use crate::services::routes::{arn_path, is_cross_tenant_route, tenant_from_path};

const HOST_HEADER: &str = "Host";

/// Extracts a raw tenant identifier from the request and resolves it to a
/// canonical identifier. Never runs for platform-admin routes.
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    tenant_header: String,
    platform_label: String,
}

impl TenantResolver {
    pub fn new(directory: Arc<dyn TenantDirectory>, tenancy: &TenancyConfig) -> Self {
        Self {
            directory,
            tenant_header: tenancy.tenant_header.clone(),
            platform_label: tenancy.platform_label().to_string(),
        }
    }

    /// Extract the raw tenant value, first match wins:
    /// override header, then path patterns, then (unless the route is
    /// inherently cross-tenant) the host subdomain.
    pub fn extract(&self, request: &AuthorizeRequest) -> Option<String> {
        if let Some(value) = request.header(&self.tenant_header) {
            if !value.is_empty() {
                tracing::debug!(tenant = %value, "tenant taken from override header");
                return Some(value.to_string());
            }
        }

        let path = arn_path(&request.method_arn);

        if let Some(path) = path {
            if let Some((matcher, value)) = tenant_from_path(path) {
                tracing::debug!(tenant = %value, matcher = matcher, "tenant taken from resource path");
                return Some(value);
            }
        }

        // Listing the caller's own tenants is cross-tenant by nature; it
        // must not inherit a tenant from the host it happens to be served
        // on.
        let cross_tenant = request
            .path
            .as_deref()
            .map_or(false, is_cross_tenant_route)
            || path.map_or(false, is_cross_tenant_route);
        if cross_tenant {
            tracing::debug!("cross-tenant listing route, no tenant context");
            return None;
        }

        if let Some(host) = request.header(HOST_HEADER) {
            let label = host.split('.').next().unwrap_or_default();
            if !label.is_empty() && label != WWW_ALIAS && label != self.platform_label {
                tracing::debug!(tenant = %label, "tenant taken from host subdomain");
                return Some(label.to_string());
            }
        }

        None
    }

    /// Turn a raw value into a canonical identifier. Canonical shapes pass
    /// through without a directory lookup; an alias that the directory
    /// cannot resolve falls back to itself so the subsequent membership
    /// check decides, keeping the authorizer available when the directory
    /// is not.
    pub async fn resolve(&self, raw: &str) -> String {
        match TenantRef::classify(raw) {
            TenantRef::Platform => PLATFORM_TENANT.to_string(),
            TenantRef::Canonical(id) => id,
            TenantRef::Alias(alias) => match self.directory.resolve_alias(&alias).await {
                Ok(Some(id)) => {
                    tracing::debug!(alias = %alias, tenant = %id, "alias resolved");
                    id
                }
                Ok(None) => {
                    tracing::debug!(alias = %alias, "alias not in directory, passing through");
                    alias
                }
                Err(err) => {
                    tracing::warn!(alias = %alias, error = %err, "directory lookup failed, passing alias through");
                    alias
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::directory::MockDirectory;
    use std::collections::HashMap;

    const UUID: &str = "0ba14817-0393-4468-a457-363e1c2a7b03";

    fn resolver(directory: MockDirectory) -> TenantResolver {
        TenantResolver::new(
            Arc::new(directory),
            &TenancyConfig {
                platform_domain: "example.com".to_string(),
                tenant_header: "X-Tenant-Id".to_string(),
            },
        )
    }

    fn request(method_arn: &str, headers: &[(&str, &str)]) -> AuthorizeRequest {
        AuthorizeRequest {
            authorization_token: String::new(),
            method_arn: method_arn.to_string(),
            path: None,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn override_header_wins_over_path_and_host() {
        let r = resolver(MockDirectory::default());
        let req = request(
            "arn:aws:execute-api:r:a:api/prod/GET/tenants/creatora/videos",
            &[("X-Tenant-Id", UUID), ("Host", "other.example.com")],
        );
        assert_eq!(r.extract(&req), Some(UUID.to_string()));
    }

    #[test]
    fn path_wins_over_host() {
        let r = resolver(MockDirectory::default());
        let req = request(
            "arn:aws:execute-api:r:a:api/prod/GET/tenants/creatora/videos",
            &[("Host", "other.example.com")],
        );
        assert_eq!(r.extract(&req), Some("creatora".to_string()));
    }

    #[test]
    fn host_subdomain_is_used_last() {
        let r = resolver(MockDirectory::default());
        let req = request(
            "arn:aws:execute-api:r:a:api/prod/GET/videos",
            &[("Host", "creatora.example.com")],
        );
        assert_eq!(r.extract(&req), Some("creatora".to_string()));
    }

    #[test]
    fn www_and_platform_root_never_resolve_from_host() {
        let r = resolver(MockDirectory::default());
        for host in ["www.example.com", "example.com"] {
            let req = request("arn:aws:execute-api:r:a:api/prod/GET/videos", &[("Host", host)]);
            assert_eq!(r.extract(&req), None, "{}", host);
        }
    }

    #[test]
    fn cross_tenant_listing_ignores_host_subdomain() {
        let r = resolver(MockDirectory::default());
        let req = request(
            "arn:aws:execute-api:r:a:api/prod/GET/user/tenants",
            &[("Host", "creatora.example.com")],
        );
        assert_eq!(r.extract(&req), None);
    }

    #[tokio::test]
    async fn platform_and_www_skip_the_directory() {
        let r = resolver(MockDirectory::failing());
        assert_eq!(r.resolve("platform").await, "platform");
        assert_eq!(r.resolve("www").await, "platform");
    }

    #[tokio::test]
    async fn canonical_uuid_passes_through_without_lookup() {
        // A failing directory proves no lookup is issued.
        let r = resolver(MockDirectory::failing());
        assert_eq!(r.resolve(UUID).await, UUID);
    }

    #[tokio::test]
    async fn alias_hit_returns_canonical_id() {
        let r = resolver(MockDirectory::default().with_alias("creatora", "t-001"));
        assert_eq!(r.resolve("creatora").await, "t-001");
    }

    #[tokio::test]
    async fn alias_miss_falls_back_to_the_alias() {
        let r = resolver(MockDirectory::default());
        assert_eq!(r.resolve("creatora").await, "creatora");
    }

    #[tokio::test]
    async fn directory_failure_falls_back_to_the_alias() {
        let r = resolver(MockDirectory::failing());
        assert_eq!(r.resolve("creatora").await, "creatora");
    }
}
