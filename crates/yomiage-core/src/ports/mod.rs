//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure. They
//! contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No HTTP, audio, or filesystem types in any signature
//! - DTOs here are transport-agnostic wire shapes; conversion from adapter
//!   native types happens inside the adapter, never here

pub mod event_emitter;
pub mod profiles;
pub mod speech;

pub use event_emitter::{AppEventEmitter, NoopEmitter};
pub use profiles::{ProfileStoreError, ProfileStorePort};
pub use speech::{ReplayOutcome, SpeechPort, SpeechPortError, SpeechStatus, SpeechStatusDto, SubmitOutcome};
