//! Speech relay error types.

/// Errors that can occur while synthesizing or playing an utterance.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The synthesis engine could not be reached at all.
    #[error("Synthesis engine unreachable: {0}")]
    EngineUnavailable(String),

    /// The engine was reached but rejected or failed the request.
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// The utterance was superseded by a newer request. Expected, silent.
    #[error("Utterance cancelled")]
    Cancelled,

    /// No speakable text remained after cleanup. Expected, silent.
    #[error("No speakable text")]
    EmptyInput,

    /// Failed to open the audio output stream.
    #[error("Failed to open audio output stream: {0}")]
    OutputStreamError(String),

    /// The engine returned audio the output device cannot decode.
    #[error("Audio decode error: {0}")]
    DecodeError(String),

    /// The dedicated audio thread is gone.
    #[error("Audio thread died")]
    AudioThreadDied,
}

impl SpeechError {
    /// Whether this outcome is an expected silent termination rather than a
    /// reportable failure.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::Cancelled | Self::EmptyInput)
    }
}
