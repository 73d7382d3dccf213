//! Profile store port — character-table persistence as the core sees it.
//!
//! The table itself is edited only through an external surface; from the
//! core's viewpoint the store resolves names, switches the active profile,
//! and enumerates what exists on disk.

use thiserror::Error;

use crate::profile::VoiceProfile;

/// Errors from the profile persistence collaborator.
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    /// Reading or writing the profile directory failed.
    #[error("profile store I/O error: {0}")]
    Io(String),

    /// A characters.json file did not parse or lacked its `default` entry.
    #[error("invalid character table: {0}")]
    Invalid(String),
}

/// Read-mostly access to the character profile library.
///
/// Name resolution never fails: an unknown speaker resolves to the active
/// table's `"default"` entry.
pub trait ProfileStorePort: Send + Sync {
    /// Resolve a speaker name against the active character table.
    fn resolve(&self, speaker_name: &str) -> VoiceProfile;

    /// Name of the currently active profile.
    fn current_profile(&self) -> String;

    /// Enumerate profiles that exist in the library.
    fn list_profiles(&self) -> Result<Vec<String>, ProfileStoreError>;

    /// Switch the active profile, creating it from the default template if
    /// it does not exist yet.
    fn load_profile(&self, name: &str) -> Result<(), ProfileStoreError>;
}
