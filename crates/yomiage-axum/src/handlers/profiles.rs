//! Axum handlers for the `/api/profile/*` endpoints.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use yomiage_core::AppEvent;

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoadProfileRequest {
    pub profile: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentProfileResponse {
    pub profile: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<String>,
}

/// `GET /api/profile/current`
pub async fn current(
    State(state): State<AppState>,
) -> Result<Json<CurrentProfileResponse>, HttpError> {
    Ok(Json(CurrentProfileResponse {
        profile: state.profiles.current_profile(),
    }))
}

/// `GET /api/profile/list`
pub async fn list(State(state): State<AppState>) -> Result<Json<ProfileListResponse>, HttpError> {
    Ok(Json(ProfileListResponse {
        profiles: state.profiles.list_profiles()?,
    }))
}

/// `POST /api/profile/load`
///
/// Switches the active profile at runtime. The current utterance is stopped
/// first so nothing keeps playing with the outgoing table's voice.
pub async fn load(
    State(state): State<AppState>,
    Json(request): Json<LoadProfileRequest>,
) -> Result<Json<CurrentProfileResponse>, HttpError> {
    let profile = request.profile.trim().to_string();
    if profile.is_empty() {
        return Err(HttpError::BadRequest("missing profile name".to_string()));
    }

    state.speech.stop().await?;
    state.profiles.load_profile(&profile)?;

    state.emitter.emit(AppEvent::ProfileLoaded {
        profile: profile.clone(),
    });
    info!(profile = %profile, "Profile switched via HTTP");
    Ok(Json(CurrentProfileResponse { profile }))
}
