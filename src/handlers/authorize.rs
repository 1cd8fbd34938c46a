//! The per-request authorization entry point.

use axum::{extract::State, Json};

use crate::dtos::{AuthorizeRequest, AuthorizerResponse};
use crate::error::AppError;
use crate::services::{policy, routes, RouteClass};
use crate::AppState;

/// Run the full pipeline for one gateway invocation.
///
/// Denials and every pipeline error collapse to a single externally-visible
/// outcome, a context-free Deny policy, so the boundary never tells a
/// prober why access was refused. The HTTP status is 200 either way; the
/// decision lives in the policy document.
pub async fn authorize(
    State(state): State<AppState>,
    Json(request): Json<AuthorizeRequest>,
) -> Json<AuthorizerResponse> {
    match run_pipeline(&state, &request).await {
        Ok(response) => Json(response),
        Err(err) => {
            tracing::warn!(
                error = %err,
                method_arn = %request.method_arn,
                "authorization denied"
            );
            Json(policy::deny(&request.method_arn))
        }
    }
}

async fn run_pipeline(
    state: &AppState,
    request: &AuthorizeRequest,
) -> Result<AuthorizerResponse, AppError> {
    let identity = state.verifier.verify(&request.authorization_token).await?;

    let class = routes::classify(&request.method_arn);

    // Tenant resolution is skipped entirely for platform-admin routes;
    // their context is pinned to the platform sentinel by the engine.
    let tenant = match class {
        RouteClass::PlatformAdmin => None,
        RouteClass::PublicTenant | RouteClass::TenantScoped => {
            match state.resolver.extract(request) {
                Some(raw) => Some(state.resolver.resolve(&raw).await),
                None => None,
            }
        }
    };

    let decision = state.engine.decide(class, &identity, tenant.as_deref()).await?;

    tracing::info!(
        subject = %identity.subject,
        tenant = %decision.tenant_id,
        route_class = ?class,
        "access allowed"
    );

    let context = policy::build_context(&identity, &decision.tenant_id);
    Ok(policy::allow(&identity.subject, &request.method_arn, context))
}
