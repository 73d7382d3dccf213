//! Speech port — the playback controller surface the intake adapter uses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::SpeakRequest;

/// What happened to a submitted speak request at the intake boundary.
///
/// Synthesis runs after submission; engine failures surface through events
/// and the status snapshot, not through this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The request was handed to the playback controller.
    Accepted,
    /// The request carried no speakable text and was silently dropped.
    IgnoredEmpty,
}

/// What happened to a replay trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// The last utterance was re-submitted.
    Accepted,
    /// Nothing has been spoken yet — a no-op, not an error.
    NoUtterance,
    /// A replay was accepted less than the cooldown ago.
    CoolingDown,
}

/// Controller states, as exposed by the status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechStatus {
    Idle,
    Synthesizing,
    Playing,
}

/// Transport-agnostic controller state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechStatusDto {
    /// Current controller state.
    pub state: SpeechStatus,
    /// Speaker of the active or most recent utterance, if any.
    pub speaker: Option<String>,
    /// Most recent engine failure, cleared by the next successful
    /// utterance.
    pub last_error: Option<String>,
}

/// Errors crossing the speech port.
///
/// Engine-level failures (`EngineUnavailable`, `SynthesisFailed`) never
/// cross this boundary synchronously; only the loss of the controller
/// itself does.
#[derive(Debug, Error)]
pub enum SpeechPortError {
    /// The controller worker has shut down and cannot accept requests.
    #[error("speech controller is not running")]
    ControllerGone,
}

/// The single ordered entry point into the playback controller.
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Submit an utterance. An accepted request unconditionally supersedes
    /// any in-flight synthesis or playback.
    async fn speak(&self, request: SpeakRequest) -> Result<SubmitOutcome, SpeechPortError>;

    /// Stop the active utterance, if any.
    async fn stop(&self) -> Result<(), SpeechPortError>;

    /// Re-submit the last spoken utterance (cooldown-gated).
    async fn replay(&self) -> Result<ReplayOutcome, SpeechPortError>;

    /// Controller state snapshot.
    async fn status(&self) -> Result<SpeechStatusDto, SpeechPortError>;
}
