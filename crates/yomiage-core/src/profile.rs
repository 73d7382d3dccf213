//! Character voice profiles and the characters.json table shape.
//!
//! A character table maps speaker names to engine voice parameters. The
//! reserved `"default"` entry is the fallback for unrecognized speakers and
//! the base that named entries are merged over — a named entry only needs to
//! carry the fields it overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Engine style id used when a table carries no default at all.
pub const FALLBACK_STYLE_ID: u32 = 2;

/// Reserved table key for the fallback voice.
pub const DEFAULT_SPEAKER: &str = "default";

/// Voice parameter overrides, in the engine's audio-query field names.
///
/// All fields optional so that a table entry (or a per-request override)
/// only states what it changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoiceParams {
    pub speed_scale: Option<f32>,
    pub pitch_scale: Option<f32>,
    pub intonation_scale: Option<f32>,
    pub volume_scale: Option<f32>,
}

impl VoiceParams {
    /// Overlay `other` on top of `self`: fields set in `other` win.
    #[must_use]
    pub fn merged_with(self, other: Self) -> Self {
        Self {
            speed_scale: other.speed_scale.or(self.speed_scale),
            pitch_scale: other.pitch_scale.or(self.pitch_scale),
            intonation_scale: other.intonation_scale.or(self.intonation_scale),
            volume_scale: other.volume_scale.or(self.volume_scale),
        }
    }

    /// Stable textual form for dedup keys.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!(
            "{:?}/{:?}/{:?}/{:?}",
            self.speed_scale, self.pitch_scale, self.intonation_scale, self.volume_scale
        )
    }
}

/// One entry of a character table, as persisted in characters.json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterEntry {
    /// Engine speaker (character) id — used by the catalog/editing surface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<u32>,

    /// Engine style id — the value both synthesis phases send on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<u32>,

    /// Voice parameter overrides for this character.
    pub voice_params: VoiceParams,
}

/// Fully resolved voice configuration for one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    /// The speaker name this profile resolved from.
    pub speaker_name: String,
    /// Engine speaker (character) id.
    pub engine_speaker_id: u32,
    /// Engine style id sent as the wire `speaker` parameter.
    pub style_id: u32,
    pub speed: f32,
    pub pitch: f32,
    pub intonation: f32,
    pub volume: f32,
}

/// Character name → voice configuration table (the characters.json shape).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterTable {
    pub entries: BTreeMap<String, CharacterEntry>,
}

impl CharacterTable {
    /// The minimal valid table: a single `"default"` entry.
    #[must_use]
    pub fn default_template() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            DEFAULT_SPEAKER.to_string(),
            CharacterEntry {
                speaker_id: Some(FALLBACK_STYLE_ID),
                style_id: Some(FALLBACK_STYLE_ID),
                voice_params: VoiceParams {
                    speed_scale: Some(1.0),
                    pitch_scale: Some(0.0),
                    intonation_scale: Some(1.0),
                    volume_scale: Some(1.0),
                },
            },
        );
        Self { entries }
    }

    /// Whether the table carries the mandatory `"default"` entry.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.entries.contains_key(DEFAULT_SPEAKER)
    }

    /// Resolve a speaker name to a full voice profile.
    ///
    /// Exact name match; a named entry is merged over the `"default"`
    /// entry, field by field. A miss resolves to the default entry alone.
    /// Never fails — an unknown speaker is the expected common case.
    #[must_use]
    pub fn resolve(&self, speaker_name: &str) -> VoiceProfile {
        let base = self.entries.get(DEFAULT_SPEAKER).cloned().unwrap_or_default();
        let merged = match self.entries.get(speaker_name) {
            Some(specific) => CharacterEntry {
                speaker_id: specific.speaker_id.or(base.speaker_id),
                style_id: specific.style_id.or(base.style_id),
                voice_params: base.voice_params.merged_with(specific.voice_params),
            },
            None => base,
        };

        let style_id = merged.style_id.unwrap_or(FALLBACK_STYLE_ID);
        VoiceProfile {
            speaker_name: speaker_name.to_string(),
            engine_speaker_id: merged.speaker_id.unwrap_or(style_id),
            style_id,
            speed: merged.voice_params.speed_scale.unwrap_or(1.0),
            pitch: merged.voice_params.pitch_scale.unwrap_or(0.0),
            intonation: merged.voice_params.intonation_scale.unwrap_or(1.0),
            volume: merged.voice_params.volume_scale.unwrap_or(1.0),
        }
    }
}
