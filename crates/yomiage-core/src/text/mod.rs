//! The intake text pipeline: control-code cleanup, speaker extraction, and
//! name-mode normalization.
//!
//! Everything here is a pure function over `&str`. The composition applied
//! at request intake lives in [`prepare`]; the individual passes are exposed
//! for direct use and testing.

mod clean;
mod extract;
mod normalize;

pub use clean::clean_message_text;
pub use extract::{extract_speaker, is_dialogue_like, is_speaker_like};
pub use normalize::{NameMode, normalize, strip_prefix};

/// Outcome of the intake pipeline for one raw text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedUtterance {
    /// Recovered or passed-through speaker name, if any.
    pub speaker: Option<String>,
    /// The body to synthesize.
    pub body: String,
}

/// Run the full intake pipeline over one raw text block.
///
/// Cleans game-engine control codes first, then resolves the speaker:
///
/// - An explicit `speaker_name` wins; extraction is skipped and only the
///   inline-prefix strip is applied to the body (never the first-line
///   strip — the name did not come from the text, so removing a line
///   would drop dialogue).
/// - Otherwise extraction runs. A recovered speaker gets the same single
///   inline-prefix pass over the remaining body.
/// - Untagged, unextracted text gets the full configured mode.
///
/// Returns `None` when the text is empty after cleanup — the caller treats
/// that as a silent no-op, not an error.
#[must_use]
pub fn prepare(raw: &str, speaker_name: Option<&str>, mode: NameMode) -> Option<PreparedUtterance> {
    let cleaned = clean_message_text(raw);
    if cleaned.is_empty() {
        return None;
    }

    let tagged = speaker_name.map(str::trim).filter(|n| !n.is_empty());

    let (speaker, body) = if let Some(name) = tagged {
        (Some(name.to_string()), residual_strip(&cleaned, mode))
    } else if let (Some(found), remainder) = extract_speaker(&cleaned) {
        (Some(found), residual_strip(&remainder, mode))
    } else {
        (None, normalize(&cleaned, mode))
    };

    let body = body.trim().to_string();
    if body.is_empty() {
        return None;
    }
    Some(PreparedUtterance { speaker, body })
}

/// The conservative second pass over a body whose speaker is already known:
/// one inline-prefix strip, mode permitting, and nothing else.
fn residual_strip(body: &str, mode: NameMode) -> String {
    if mode == NameMode::Keep {
        body.to_string()
    } else {
        strip_prefix(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_name_skips_extraction() {
        let out = prepare("莉莉\nお元気ですか。", Some("ナレーター"), NameMode::Auto)
            .expect("non-empty");
        assert_eq!(out.speaker.as_deref(), Some("ナレーター"));
        // First-line strip must NOT run — 莉莉 stays in the body.
        assert_eq!(out.body, "莉莉\nお元気ですか。");
    }

    #[test]
    fn untagged_text_recovers_speaker() {
        let out = prepare("莉莉\nお元気ですか？", None, NameMode::Auto).expect("non-empty");
        assert_eq!(out.speaker.as_deref(), Some("莉莉"));
        assert_eq!(out.body, "お元気ですか？");
    }

    #[test]
    fn extracted_body_still_gets_prefix_pass() {
        let out = prepare("莉莉\n側近：「はい。」", None, NameMode::Auto).expect("non-empty");
        assert_eq!(out.speaker.as_deref(), Some("莉莉"));
        assert_eq!(out.body, "「はい。」");
    }

    #[test]
    fn keep_mode_is_identity_after_cleanup() {
        let out = prepare("莉莉：你好嗎？", Some("莉莉"), NameMode::Keep).expect("non-empty");
        assert_eq!(out.body, "莉莉：你好嗎？");
    }

    #[test]
    fn empty_after_cleanup_is_none() {
        assert!(prepare("  \n\t\n", None, NameMode::Auto).is_none());
        assert!(prepare("\\C[2]\\C[0]", None, NameMode::Auto).is_none());
    }
}
