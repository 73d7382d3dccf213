//! Conservative speaker-line recovery.
//!
//! Game dialogue often arrives as a bare name line followed by the spoken
//! text, with no structured attribution. Recovery is deliberately strict:
//! the candidate line must *look like a name* AND the following line must
//! *look like dialogue* before anything is split off. A short dialogue line
//! without terminal punctuation fails the second test and is left intact —
//! misreading dialogue as a name loses words, declining loses nothing.

/// Characters that open a quoted/bracketed dialogue line.
const OPENING_BRACKETS: &[char] = &['「', '『', '（', '(', '【', '['];

/// Punctuation that never appears inside a bare name line.
const NAME_FORBIDDEN: &[char] = &['。', '！', '？', '?', '!', '…', '「', '『', '」', '』'];

/// Sentence-terminal punctuation marking a line as dialogue.
const SENTENCE_TERMINALS: &[char] = &['。', '！', '？', '?', '!', '…'];

/// Longest line (in characters) still considered a possible name.
const MAX_SPEAKER_CHARS: usize = 20;

/// Whether a line could plausibly be a bare speaker name.
#[must_use]
pub fn is_speaker_like(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.chars().count() > MAX_SPEAKER_CHARS {
        return false;
    }
    if line.starts_with(OPENING_BRACKETS) {
        return false;
    }
    if line.contains(NAME_FORBIDDEN) {
        return false;
    }
    // Two or more consecutive whitespace chars read as columns, not a name.
    let mut prev_ws = false;
    for c in line.chars() {
        let ws = c.is_whitespace();
        if ws && prev_ws {
            return false;
        }
        prev_ws = ws;
    }
    true
}

/// Whether a line reads as spoken dialogue.
#[must_use]
pub fn is_dialogue_like(line: &str) -> bool {
    let line = line.trim();
    line.starts_with(OPENING_BRACKETS) || line.contains(SENTENCE_TERMINALS)
}

/// Split a text block into `(speaker, body)` when its first line is a
/// speaker label followed by dialogue.
///
/// The first non-blank line is the name candidate; the next non-blank line
/// must classify as dialogue. On success the candidate's trimmed content is
/// returned and its line removed from the body; every other line — blank
/// lines included — is preserved in order. On failure the original text is
/// returned unchanged with no speaker.
#[must_use]
pub fn extract_speaker(text: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = text.split('\n').collect();

    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return (None, text.to_string());
    };
    let Some(second) = lines
        .iter()
        .skip(first + 1)
        .position(|l| !l.trim().is_empty())
        .map(|off| first + 1 + off)
    else {
        return (None, text.to_string());
    };

    if !is_speaker_like(lines[first]) || !is_dialogue_like(lines[second]) {
        return (None, text.to_string());
    }

    let speaker = lines[first].trim().to_string();
    let body: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, l)| (i != first).then_some(*l))
        .collect();
    (Some(speaker), body.join("\n"))
}
