//! Axum handlers for the speak/stop/replay/status endpoints.
//!
//! The speak handler is the request-intake boundary: it runs the core text
//! pipeline (cleanup, speaker extraction, name-mode normalization) and
//! hands the resulting `SpeakRequest` to the playback controller. Request
//! body fields keep the snake_case names the dialogue hook has always sent.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::debug;

use yomiage_core::ports::{ReplayOutcome, SpeechStatusDto, SubmitOutcome};
use yomiage_core::profile::VoiceParams;
use yomiage_core::request::SpeakRequest;
use yomiage_core::text;

use crate::error::HttpError;
use crate::state::AppState;

// ── Request/response shapes ───────────────────────────────────────────────────

/// `POST /api/speak` body, as sent by the dialogue hook and test surface.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpeakBody {
    /// Explicit speaker name, when the game showed a name box.
    pub name: Option<String>,
    /// Raw utterance text.
    pub text: String,
    /// Optional engine style override.
    pub style_id: Option<u32>,
    /// Optional voice parameter overrides.
    pub voice_params: Option<VoiceParams>,
    /// Whether this request may suppress an identical recent utterance
    /// (`false`) or not (`true`).
    pub interrupt: bool,
    /// Skip the dedup gate entirely.
    pub no_dedup: bool,
}

/// Uniform outcome envelope for the speak-side POST endpoints.
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub outcome: &'static str,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /api/speak`
pub async fn speak(
    State(state): State<AppState>,
    Json(body): Json<SpeakBody>,
) -> Result<Json<OutcomeResponse>, HttpError> {
    let Some(prepared) = text::prepare(&body.text, body.name.as_deref(), state.name_mode) else {
        debug!("Speak request empty after cleanup");
        return Ok(Json(OutcomeResponse {
            outcome: "ignored_empty",
        }));
    };

    let request = SpeakRequest {
        speaker_name: prepared
            .speaker
            .unwrap_or_else(|| yomiage_core::profile::DEFAULT_SPEAKER.to_string()),
        text: prepared.body,
        interrupt: body.interrupt,
        force_bypass_dedup: body.no_dedup,
        style_override: body.style_id,
        params_override: body.voice_params,
    };

    let outcome = state.speech.speak(request).await?;
    Ok(Json(OutcomeResponse {
        outcome: match outcome {
            SubmitOutcome::Accepted => "accepted",
            SubmitOutcome::IgnoredEmpty => "ignored_empty",
        },
    }))
}

/// `POST /api/stop`
pub async fn stop(State(state): State<AppState>) -> Result<Json<OutcomeResponse>, HttpError> {
    state.speech.stop().await?;
    Ok(Json(OutcomeResponse { outcome: "stopped" }))
}

/// `POST /api/replay`
pub async fn replay(State(state): State<AppState>) -> Result<Json<OutcomeResponse>, HttpError> {
    let outcome = state.speech.replay().await?;
    Ok(Json(OutcomeResponse {
        outcome: match outcome {
            ReplayOutcome::Accepted => "accepted",
            ReplayOutcome::NoUtterance => "no_utterance",
            ReplayOutcome::CoolingDown => "cooling_down",
        },
    }))
}

/// `GET /api/status`
pub async fn status(State(state): State<AppState>) -> Result<Json<SpeechStatusDto>, HttpError> {
    Ok(Json(state.speech.status().await?))
}
