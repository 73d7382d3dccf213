//! Runtime settings shared by the adapters.
//!
//! Pure domain types with no infrastructure dependencies. All fields are
//! optional so a partially specified config (CLI flags, future config file)
//! falls back gracefully.

use serde::{Deserialize, Serialize};

use crate::text::NameMode;

/// Default base address of the local synthesis engine.
pub const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:50021";

/// Default port for the loopback intake server.
pub const DEFAULT_INTAKE_PORT: u16 = 5005;

/// Default bind host for the intake server.
pub const DEFAULT_INTAKE_HOST: &str = "127.0.0.1";

/// Application settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the synthesis engine.
    pub engine_url: Option<String>,

    /// Host the intake server binds to.
    pub intake_host: Option<String>,

    /// Port the intake server binds to.
    pub intake_port: Option<u16>,

    /// Strategy for removing speaker framing from untagged dialogue.
    pub name_mode: Option<NameMode>,

    /// Whether duplicate suppression is enabled.
    pub dedup_enabled: Option<bool>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            engine_url: Some(DEFAULT_ENGINE_URL.to_string()),
            intake_host: Some(DEFAULT_INTAKE_HOST.to_string()),
            intake_port: Some(DEFAULT_INTAKE_PORT),
            name_mode: Some(NameMode::Auto),
            dedup_enabled: Some(true),
        }
    }

    /// Get the effective engine URL (with default fallback).
    #[must_use]
    pub fn effective_engine_url(&self) -> &str {
        self.engine_url.as_deref().unwrap_or(DEFAULT_ENGINE_URL)
    }

    /// Get the effective intake host (with default fallback).
    #[must_use]
    pub fn effective_intake_host(&self) -> &str {
        self.intake_host.as_deref().unwrap_or(DEFAULT_INTAKE_HOST)
    }

    /// Get the effective intake port (with default fallback).
    #[must_use]
    pub const fn effective_intake_port(&self) -> u16 {
        match self.intake_port {
            Some(port) => port,
            None => DEFAULT_INTAKE_PORT,
        }
    }

    /// Get the effective name mode (with default fallback).
    #[must_use]
    pub fn effective_name_mode(&self) -> NameMode {
        self.name_mode.unwrap_or_default()
    }

    /// Get whether dedup is effectively enabled (default: yes).
    #[must_use]
    pub const fn effective_dedup_enabled(&self) -> bool {
        match self.dedup_enabled {
            Some(enabled) => enabled,
            None => true,
        }
    }
}
