//! `SynthesisEngine` — trait abstraction over the external synthesis
//! backend.
//!
//! The backend interaction is two-phase: build an audio query from text and
//! voice parameters, then render audio from that query. Both phases are
//! independently cancellable; [`synthesize`] composes them into the single
//! cancellable operation the playback controller consumes.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use yomiage_core::profile::VoiceProfile;

use crate::error::SpeechError;

/// An engine audio query — opaque to the controller, produced by phase one
/// and consumed by phase two.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioQuery(pub serde_json::Value);

/// Abstraction over the two-phase synthesis backend.
///
/// # Cancellation
///
/// Implementations must observe `cancel` cooperatively: once it fires, the
/// in-flight phase returns [`SpeechError::Cancelled`] promptly and no
/// further network traffic is submitted.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Phase one: build an audio query for `text` with the profile's voice
    /// parameters applied.
    async fn build_query(
        &self,
        text: &str,
        profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<AudioQuery, SpeechError>;

    /// Phase two: render the query to a playable audio buffer (WAV bytes).
    async fn render(
        &self,
        query: &AudioQuery,
        profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, SpeechError>;
}

/// Run both phases as one cancellable operation.
///
/// The token is re-checked between phases so a supersession that lands
/// while phase one is returning never submits phase two.
pub async fn synthesize(
    engine: &dyn SynthesisEngine,
    text: &str,
    profile: &VoiceProfile,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, SpeechError> {
    let query = engine.build_query(text, profile, cancel).await?;
    if cancel.is_cancelled() {
        return Err(SpeechError::Cancelled);
    }
    engine.render(&query, profile, cancel).await
}
