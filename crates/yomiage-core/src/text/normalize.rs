//! Name-mode normalization — removing speaker framing from a body before
//! synthesis.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::extract::extract_speaker;

/// `莉莉：` style inline prefix: up to 20 characters with no colon, then an
/// ASCII or full-width colon. Matched once, anchored at the start, across
/// the whole text (a prefix may span a line break).
static INLINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^[^:：]{1,20}[:：]").expect("valid pattern"));

/// Strategy for removing speaker framing from dialogue text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameMode {
    /// Leave the text untouched.
    Keep,
    /// Remove a single `名前：` inline prefix.
    StripPrefix,
    /// Remove a leading name line when the two-classifier test passes.
    StripFirstLine,
    /// Try the inline prefix first, fall back to the first-line strip.
    #[default]
    Auto,
}

/// Remove one inline `名前：` prefix, or return the text unchanged.
#[must_use]
pub fn strip_prefix(text: &str) -> String {
    INLINE_PREFIX.replace(text, "").into_owned()
}

/// Remove the first non-blank line when it classifies as a speaker label
/// followed by dialogue, or return the text unchanged.
#[must_use]
pub fn strip_first_line(text: &str) -> String {
    match extract_speaker(text) {
        (Some(_), body) => body,
        (None, original) => original,
    }
}

/// Apply one normalization mode. Pure; never fails.
#[must_use]
pub fn normalize(text: &str, mode: NameMode) -> String {
    match mode {
        NameMode::Keep => text.to_string(),
        NameMode::StripPrefix => strip_prefix(text),
        NameMode::StripFirstLine => strip_first_line(text),
        NameMode::Auto => {
            let stripped = strip_prefix(text);
            if stripped == text {
                strip_first_line(text)
            } else {
                stripped
            }
        }
    }
}
