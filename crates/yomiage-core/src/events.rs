//! Canonical event union for cross-adapter observability.
//!
//! Emitted by the playback controller and the profile store through the
//! [`AppEventEmitter`](crate::ports::AppEventEmitter) port. Serialized with
//! a `type` tag so a future SSE/log consumer gets self-describing payloads.

use serde::{Deserialize, Serialize};

/// Events the core emits while relaying utterances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// Synthesis for an utterance has begun.
    SpeakStarted {
        /// Speaker the utterance is attributed to.
        speaker: String,
    },

    /// An utterance finished playing naturally.
    SpeakFinished {
        /// Speaker the utterance was attributed to.
        speaker: String,
    },

    /// Synthesis or playback failed (engine unreachable, engine rejected
    /// the request, or the audio device refused the buffer).
    SpeakFailed {
        /// Speaker the utterance was attributed to.
        speaker: String,
        /// Human-readable failure description.
        error: String,
    },

    /// A request was suppressed by the dedup gate.
    SpeakSuppressed {
        /// Speaker of the suppressed request.
        speaker: String,
    },

    /// The active character profile was switched.
    ProfileLoaded {
        /// Name of the newly active profile.
        profile: String,
    },
}
