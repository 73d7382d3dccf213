//! Axum handlers for liveness and the engine catalog passthrough.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// `GET /api/speakers`
///
/// The engine's voice catalog, passed through verbatim for the
/// profile-editing surface.
pub async fn speakers(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, HttpError> {
    Ok(Json(state.engine.speakers().await?))
}
