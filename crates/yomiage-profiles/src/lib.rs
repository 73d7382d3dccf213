//! File-backed character profile library.
//!
//! A profile is a folder under the library root containing a
//! `characters.json` table:
//!
//! ```text
//! profiles/default/characters.json
//! profiles/gameA/characters.json
//! ```
//!
//! Missing profiles are created from the default template on first use.
//! The core edits nothing here — writes happen only through the external
//! editing surface; this crate re-reads the table when the active profile
//! is switched.

mod store;

pub use store::ProfileLibrary;
