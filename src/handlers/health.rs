use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Liveness probe; pings the membership store so a dead database surfaces
/// here rather than as a wall of denials.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.memberships.ping().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    }))
}
