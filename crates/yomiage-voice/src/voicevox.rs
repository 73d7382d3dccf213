//! VOICEVOX engine adapter — implements [`SynthesisEngine`] over the
//! engine's local HTTP API.
//!
//! Wire flow per utterance:
//!
//! 1. `POST /audio_query?text=…&speaker=<style_id>` → query JSON
//! 2. profile scales written into the query (`speedScale`, `pitchScale`,
//!    `intonationScale`, `volumeScale`)
//! 3. `POST /synthesis?speaker=<style_id>` with the query body → WAV bytes
//!
//! Connection-level failures map to `EngineUnavailable`, anything the
//! engine answered but refused to `SynthesisFailed`. Nothing is retried —
//! by the time an error is known the utterance may already be superseded.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use yomiage_core::profile::VoiceProfile;

use crate::engine::{AudioQuery, SynthesisEngine};
use crate::error::SpeechError;

/// Default request timeout against the engine.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimal VOICEVOX engine client.
pub struct VoicevoxClient {
    client: reqwest::Client,
    base_url: String,
}

impl VoicevoxClient {
    /// Create a client for an engine at `base_url`
    /// (e.g. `http://127.0.0.1:50021`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SpeechError::EngineUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /speakers` — the engine's voice catalog, passed through verbatim
    /// for the profile-editing surface.
    pub async fn speakers(&self) -> Result<serde_json::Value, SpeechError> {
        let response = self
            .client
            .get(self.url("/speakers"))
            .send()
            .await
            .map_err(map_transport_err)?;
        let response = check_status(response)?;
        response
            .json()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(format!("undecodable /speakers body: {e}")))
    }

    /// Race a request future against the cancellation token.
    async fn cancellable<T>(
        cancel: &CancellationToken,
        fut: impl Future<Output = Result<T, SpeechError>>,
    ) -> Result<T, SpeechError> {
        tokio::select! {
            () = cancel.cancelled() => Err(SpeechError::Cancelled),
            result = fut => result,
        }
    }
}

#[async_trait]
impl SynthesisEngine for VoicevoxClient {
    async fn build_query(
        &self,
        text: &str,
        profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<AudioQuery, SpeechError> {
        let request = self
            .client
            .post(self.url("/audio_query"))
            .query(&[("text", text), ("speaker", &profile.style_id.to_string())]);

        let mut query: serde_json::Value = Self::cancellable(cancel, async {
            let response = request.send().await.map_err(map_transport_err)?;
            let response = check_status(response)?;
            response.json().await.map_err(|e| {
                SpeechError::SynthesisFailed(format!("undecodable audio query: {e}"))
            })
        })
        .await?;

        apply_scales(&mut query, profile);
        debug!(style_id = profile.style_id, text_len = text.len(), "Built audio query");
        Ok(AudioQuery(query))
    }

    async fn render(
        &self,
        query: &AudioQuery,
        profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, SpeechError> {
        let request = self
            .client
            .post(self.url("/synthesis"))
            .query(&[("speaker", &profile.style_id.to_string())])
            .json(&query.0);

        let wav = Self::cancellable(cancel, async {
            let response = request.send().await.map_err(map_transport_err)?;
            let response = check_status(response)?;
            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(map_transport_err)
        })
        .await?;

        debug!(style_id = profile.style_id, wav_bytes = wav.len(), "Rendered audio");
        Ok(wav)
    }
}

/// Write the profile's voice scales into an audio query, touching only
/// fields the engine actually produced.
fn apply_scales(query: &mut serde_json::Value, profile: &VoiceProfile) {
    let overrides = [
        ("speedScale", profile.speed),
        ("pitchScale", profile.pitch),
        ("intonationScale", profile.intonation),
        ("volumeScale", profile.volume),
    ];
    if let Some(map) = query.as_object_mut() {
        for (field, value) in overrides {
            if map.contains_key(field) {
                map.insert(field.to_string(), serde_json::json!(value));
            }
        }
    }
}

/// Connection-level errors mean the engine is down; anything after a
/// connection was established is the engine failing the request.
fn map_transport_err(e: reqwest::Error) -> SpeechError {
    if e.is_connect() || e.is_timeout() {
        SpeechError::EngineUnavailable(e.to_string())
    } else {
        SpeechError::SynthesisFailed(e.to_string())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SpeechError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SpeechError::SynthesisFailed(format!(
            "engine returned HTTP {status}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(style_id: u32) -> VoiceProfile {
        VoiceProfile {
            speaker_name: "莉莉".to_string(),
            engine_speaker_id: style_id,
            style_id,
            speed: 1.2,
            pitch: 0.05,
            intonation: 0.9,
            volume: 1.0,
        }
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = VoicevoxClient::new("http://127.0.0.1:50021/").expect("client");
        assert_eq!(client.url("/speakers"), "http://127.0.0.1:50021/speakers");
    }

    #[test]
    fn apply_scales_overrides_existing_fields_only() {
        let mut query = serde_json::json!({
            "accent_phrases": [],
            "speedScale": 1.0,
            "pitchScale": 0.0,
            "intonationScale": 1.0,
            "volumeScale": 1.0,
            "outputSamplingRate": 24000
        });
        apply_scales(&mut query, &profile(8));
        assert_eq!(query["speedScale"], serde_json::json!(1.2f32));
        assert_eq!(query["pitchScale"], serde_json::json!(0.05f32));
        assert_eq!(query["outputSamplingRate"], serde_json::json!(24000));
    }

    #[test]
    fn apply_scales_ignores_missing_fields() {
        let mut query = serde_json::json!({ "accent_phrases": [] });
        apply_scales(&mut query, &profile(8));
        assert!(query.get("speedScale").is_none());
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result: Result<(), SpeechError> =
            VoicevoxClient::cancellable(&cancel, std::future::pending()).await;
        assert!(matches!(result, Err(SpeechError::Cancelled)));
    }
}
