//! Collaborator traits for tenant and membership lookups, plus in-memory
//! implementations used by tests.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{Membership, ADMIN_ROLE};

/// Read-only alias → canonical tenant id lookup. A miss is `Ok(None)`,
/// never an error.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn resolve_alias(&self, alias: &str) -> Result<Option<String>, AppError>;
}

/// Read-only per-(subject, tenant) role records.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Exact membership record for one caller in one tenant.
    async fn membership(
        &self,
        subject: &str,
        tenant_id: &str,
    ) -> Result<Option<Membership>, AppError>;

    /// Tenants in which the caller holds the admin role; used only for the
    /// platform-tenant cross-tenant check.
    async fn admin_tenants(&self, subject: &str) -> Result<Vec<String>, AppError>;

    /// Liveness probe for the backing store. Defaults to healthy for
    /// implementations with nothing to verify.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory directory for tests: a fixed alias map, optionally failing
/// every lookup to exercise the availability fallback.
#[derive(Default)]
pub struct MockDirectory {
    aliases: HashMap<String, String>,
    fail_lookups: bool,
}

impl MockDirectory {
    pub fn with_alias(mut self, alias: &str, tenant_id: &str) -> Self {
        self.aliases.insert(alias.to_string(), tenant_id.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            aliases: HashMap::new(),
            fail_lookups: true,
        }
    }
}

#[async_trait]
impl TenantDirectory for MockDirectory {
    async fn resolve_alias(&self, alias: &str) -> Result<Option<String>, AppError> {
        if self.fail_lookups {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "mock directory unavailable"
            )));
        }
        Ok(self.aliases.get(alias).cloned())
    }
}

/// In-memory membership store for tests.
#[derive(Default)]
pub struct MockMemberships {
    records: Vec<Membership>,
}

impl MockMemberships {
    pub fn with_member(mut self, subject: &str, tenant_id: &str, role: &str) -> Self {
        self.records.push(Membership {
            user_id: subject.to_string(),
            tenant_id: tenant_id.to_string(),
            role: role.to_string(),
        });
        self
    }
}

#[async_trait]
impl MembershipStore for MockMemberships {
    async fn membership(
        &self,
        subject: &str,
        tenant_id: &str,
    ) -> Result<Option<Membership>, AppError> {
        Ok(self
            .records
            .iter()
            .find(|m| m.user_id == subject && m.tenant_id == tenant_id)
            .cloned())
    }

    async fn admin_tenants(&self, subject: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .records
            .iter()
            .filter(|m| m.user_id == subject && m.role == ADMIN_ROLE)
            .map(|m| m.tenant_id.clone())
            .collect())
    }
}
