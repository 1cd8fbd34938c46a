//! Multi-tenant request authorizer for an edge gateway.
//!
//! One invocation per inbound API call, before the call reaches application
//! logic: verify the bearer credential against the identity provider's key
//! set, resolve which tenant the call concerns, decide allow-or-deny, and
//! emit a scoped, cacheable policy for the gateway. The pipeline is
//! strictly linear: key resolution → token verification → endpoint
//! classification → tenant resolution → access decision → policy synthesis.

pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::AuthorizerConfig;
use crate::services::{
    AccessDecisionEngine, KeyResolver, MembershipStore, TenantDirectory, TenantResolver,
    TokenVerifier,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AuthorizerConfig,
    pub verifier: Arc<TokenVerifier>,
    pub resolver: Arc<TenantResolver>,
    pub engine: Arc<AccessDecisionEngine>,
    pub memberships: Arc<dyn MembershipStore>,
}

impl AppState {
    /// Wire the pipeline components from their injected collaborators.
    /// Collaborators are trait objects so tests swap in static keys and
    /// in-memory stores.
    pub fn new(
        config: AuthorizerConfig,
        keys: Arc<dyn KeyResolver>,
        directory: Arc<dyn TenantDirectory>,
        memberships: Arc<dyn MembershipStore>,
    ) -> Self {
        let verifier = Arc::new(TokenVerifier::new(keys, config.identity.issuer()));
        let resolver = Arc::new(TenantResolver::new(directory, &config.tenancy));
        let engine = Arc::new(AccessDecisionEngine::new(memberships.clone()));

        Self {
            config,
            verifier,
            resolver,
            engine,
            memberships,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/authorize", post(handlers::authorize::authorize))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
