//! PostgreSQL-backed tenant directory and membership store.
//!
//! Uses sqlx with runtime queries. Both collaborators are read-only from
//! this service's perspective; the tables' write paths live elsewhere.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::AppError;
use crate::models::{Membership, ADMIN_ROLE};
use crate::services::directory::{MembershipStore, TenantDirectory};

/// PostgreSQL connection wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to connect to database");
                AppError::DatabaseError(anyhow::anyhow!("failed to connect to database: {}", e))
            })?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }
}

#[async_trait]
impl TenantDirectory for Database {
    async fn resolve_alias(&self, alias: &str) -> Result<Option<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT tenant_id FROM tenants WHERE tenant_alias = $1")
            .bind(alias)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }
}

#[async_trait]
impl MembershipStore for Database {
    async fn membership(
        &self,
        subject: &str,
        tenant_id: &str,
    ) -> Result<Option<Membership>, AppError> {
        sqlx::query_as::<_, Membership>(
            "SELECT user_id, tenant_id, member_role FROM tenant_members \
             WHERE user_id = $1 AND tenant_id = $2",
        )
        .bind(subject)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn admin_tenants(&self, subject: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT tenant_id FROM tenant_members WHERE user_id = $1 AND member_role = $2",
        )
        .bind(subject)
        .bind(ADMIN_ROLE)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.health_check().await
    }
}
