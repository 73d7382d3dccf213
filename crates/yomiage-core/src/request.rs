//! The speak-request domain type consumed by the playback controller.

use crate::profile::VoiceParams;

/// One synthesize-and-play unit of text attributed to one speaker.
///
/// Created at request intake after the text pipeline has run; immutable;
/// consumed exactly once by the playback controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakRequest {
    /// Resolved speaker name (`"default"` when the text carried no
    /// attribution).
    pub speaker_name: String,

    /// Cleaned and normalized utterance body.
    pub text: String,

    /// Whether this request participates in the dedup gate. A request with
    /// `interrupt == false` that duplicates the most recently spoken
    /// utterance may be suppressed; the supersession of any in-flight
    /// utterance is unconditional either way.
    pub interrupt: bool,

    /// Skip the dedup gate entirely. Always set by the replay operation.
    pub force_bypass_dedup: bool,

    /// Per-request style override applied on top of the resolved profile.
    pub style_override: Option<u32>,

    /// Per-request voice parameter overrides applied on top of the
    /// resolved profile.
    pub params_override: Option<VoiceParams>,
}

impl SpeakRequest {
    /// Plain request with no overrides and default flags.
    pub fn new(speaker_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker_name: speaker_name.into(),
            text: text.into(),
            interrupt: false,
            force_bypass_dedup: false,
            style_override: None,
            params_override: None,
        }
    }

    /// Key used by the dedup gate: the spoken text plus everything that
    /// changes how it sounds.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        let style = self
            .style_override
            .map_or_else(String::new, |s| s.to_string());
        let params = self
            .params_override
            .as_ref()
            .map_or_else(String::new, VoiceParams::fingerprint);
        format!("{}\u{1f}{}\u{1f}{style}\u{1f}{params}", self.speaker_name, self.text)
    }
}
