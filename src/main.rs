use std::net::SocketAddr;
use std::sync::Arc;

use tenant_authorizer::{
    build_router,
    config::AuthorizerConfig,
    error::AppError,
    observability::init_tracing,
    services::{Database, JwksClient, MembershipStore, TenantDirectory},
    AppState,
};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = AuthorizerConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        issuer = %config.identity.issuer(),
        "starting tenant authorizer"
    );

    let db = Arc::new(Database::connect(&config.database.url).await?);
    db.health_check().await?;
    tracing::info!("database connection established");

    // One JWKS client per process; its per-kid cache lives as long as we do.
    let jwks = Arc::new(JwksClient::new(config.identity.jwks_url()));

    let directory: Arc<dyn TenantDirectory> = db.clone();
    let memberships: Arc<dyn MembershipStore> = db;
    let state = AppState::new(config.clone(), jwks, directory, memberships);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening for gateway invocations");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // In-flight lookups are simply abandoned; nothing is mutated, so no
    // cleanup is required.
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown signal handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
