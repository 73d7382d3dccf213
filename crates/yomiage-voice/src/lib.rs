//! Speech engine adapter for yomiage.
//!
//! Wraps the VOICEVOX HTTP engine and the local audio device behind the
//! core's [`SpeechPort`](yomiage_core::ports::SpeechPort): a single-channel
//! playback controller with strict cancel-and-replace semantics, a
//! two-phase cancellable synthesis client, and rodio playback confined to a
//! dedicated audio thread.

pub mod audio_thread;
pub mod engine;
pub mod error;
pub mod playback;
pub mod service;
pub mod sink;
pub mod voicevox;

// Re-export key types for convenience
pub use engine::{AudioQuery, SynthesisEngine, synthesize};
pub use error::SpeechError;
pub use service::{DEDUP_WINDOW, REPLAY_COOLDOWN, SpeechService};
pub use sink::{AudioSink, LocalAudioSink};
pub use voicevox::VoicevoxClient;
