//! Profile library rooted at a `profiles/` directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::info;

use yomiage_core::ports::{ProfileStoreError, ProfileStorePort};
use yomiage_core::profile::{CharacterTable, VoiceProfile};

/// Table file name inside each profile directory.
const TABLE_FILE: &str = "characters.json";

/// The active character table plus the profile name it came from.
struct ActiveProfile {
    name: String,
    table: CharacterTable,
}

/// File-backed implementation of [`ProfileStorePort`].
///
/// Interior `RwLock` because resolution happens on the controller worker
/// while profile switches arrive from HTTP handlers. The lock is never held
/// across I/O — a switch parses the new table first and swaps it in one
/// write.
pub struct ProfileLibrary {
    root: PathBuf,
    active: RwLock<ActiveProfile>,
}

impl ProfileLibrary {
    /// Open a library rooted at `root`, activating `profile` (created from
    /// the default template if missing).
    pub fn open(root: impl Into<PathBuf>, profile: &str) -> Result<Self, ProfileStoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(io_err)?;

        let table = ensure_and_read(&root, profile)?;
        info!(profile, root = %root.display(), "Profile library opened");

        Ok(Self {
            root,
            active: RwLock::new(ActiveProfile {
                name: profile.to_string(),
                table,
            }),
        })
    }

    /// Path of a profile's characters.json.
    #[must_use]
    pub fn table_path(&self, profile: &str) -> PathBuf {
        self.root.join(sanitize(profile)).join(TABLE_FILE)
    }
}

impl ProfileStorePort for ProfileLibrary {
    fn resolve(&self, speaker_name: &str) -> VoiceProfile {
        self.active.read().unwrap().table.resolve(speaker_name)
    }

    fn current_profile(&self) -> String {
        self.active.read().unwrap().name.clone()
    }

    fn list_profiles(&self) -> Result<Vec<String>, ProfileStoreError> {
        let mut profiles = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if path.is_dir() && path.join(TABLE_FILE).exists() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    profiles.push(name.to_string());
                }
            }
        }
        profiles.sort();
        Ok(profiles)
    }

    fn load_profile(&self, name: &str) -> Result<(), ProfileStoreError> {
        let table = ensure_and_read(&self.root, name)?;
        let mut active = self.active.write().unwrap();
        active.name = name.to_string();
        active.table = table;
        info!(profile = name, "Switched active profile");
        Ok(())
    }
}

/// Make a profile name safe to use as a directory component.
fn sanitize(name: &str) -> String {
    name.trim().replace(['\\', '/'], "_")
}

fn io_err(e: std::io::Error) -> ProfileStoreError {
    ProfileStoreError::Io(e.to_string())
}

/// Ensure `root/<profile>/characters.json` exists (template-created when
/// missing) and parse it.
fn ensure_and_read(root: &Path, profile: &str) -> Result<CharacterTable, ProfileStoreError> {
    let dir = root.join(sanitize(profile));
    fs::create_dir_all(&dir).map_err(io_err)?;

    let path = dir.join(TABLE_FILE);
    if !path.exists() {
        let template = CharacterTable::default_template();
        let json = serde_json::to_string_pretty(&template)
            .map_err(|e| ProfileStoreError::Invalid(e.to_string()))?;
        fs::write(&path, json).map_err(io_err)?;
        info!(profile, "Created profile from default template");
    }

    let raw = fs::read_to_string(&path).map_err(io_err)?;
    let table: CharacterTable = serde_json::from_str(&raw)
        .map_err(|e| ProfileStoreError::Invalid(format!("{}: {e}", path.display())))?;

    if !table.has_default() {
        return Err(ProfileStoreError::Invalid(format!(
            "{}: missing required \"default\" entry",
            path.display()
        )));
    }
    Ok(table)
}
