//! Core domain types and port definitions for yomiage.
//!
//! This crate holds everything the adapters share: the speak-request domain
//! types, the pure text pipeline (control-code cleanup, speaker extraction,
//! name-mode normalization), character voice profiles, settings, events, and
//! the port traits implemented by the profile store and the speech engine
//! adapter. It has no HTTP, audio, or filesystem dependencies.

pub mod events;
pub mod ports;
pub mod profile;
pub mod request;
pub mod settings;
pub mod text;

// Re-export commonly used types for convenience
pub use events::AppEvent;
pub use ports::{
    AppEventEmitter, NoopEmitter, ProfileStoreError, ProfileStorePort, ReplayOutcome,
    SpeechPortError, SpeechStatus, SpeechStatusDto, SpeechPort, SubmitOutcome,
};
pub use profile::{CharacterEntry, CharacterTable, VoiceParams, VoiceProfile};
pub use request::SpeakRequest;
pub use settings::{DEFAULT_ENGINE_URL, DEFAULT_INTAKE_PORT, Settings};
pub use text::{NameMode, PreparedUtterance, clean_message_text, extract_speaker, normalize, prepare};
