//! Message control-code cleanup.
//!
//! Dialogue text arriving from a game client is littered with message-window
//! control codes (`\C[2]`, `\V[1]`, `\.`, size toggles) and, on Japanese
//! Windows locales, backslash variants (`¥`, `￥`, `＼`). Everything that is
//! not speakable is scrubbed here before extraction and normalization run.

use std::sync::LazyLock;

use regex::Regex;

/// Codes that take a numeric argument: color, variable, actor name, party
/// member, icon.
static ARG_CODES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\\[CVNPI]\[\d+\]").expect("valid pattern"));

/// Argument-less codes: currency, waits, speed toggles, close/gold-window.
static BARE_CODES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\\[G.|!><^$]").expect("valid pattern"));

/// Text-size toggles `\{` and `\}`.
static SIZE_CODES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[{}]").expect("valid pattern"));

/// A stranded `[n]` left directly before a colon once its code prefix was
/// converted away (a literal `\n[3]` token turns into a newline plus `[3]`).
static STRANDED_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]([:：])").expect("valid pattern"));

/// Runs of spaces and tabs inside a line.
static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid pattern"));

/// Scrub message control codes and whitespace from one raw text block.
///
/// The pass order matters and mirrors how the codes decay: backslash
/// variants are unified first, literal newline tokens become real newlines
/// (case-insensitive, so `\N[3]` decays into a newline plus a stranded
/// `[3]` — cleaned up at the end), then the remaining code sets are removed.
/// Lines are trimmed, space runs collapsed, and leading/trailing blank
/// lines dropped.
#[must_use]
pub fn clean_message_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Unify line breaks and backslash variants.
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.replace(['¥', '￥', '＼'], "\\");

    // Literal newline tokens — double-backslash form first.
    let text = replace_newline_tokens(&text);

    let text = SIZE_CODES.replace_all(&text, "");
    let text = ARG_CODES.replace_all(&text, "");
    let text = BARE_CODES.replace_all(&text, "");
    let text = STRANDED_INDEX.replace_all(&text, "$1");

    // Per-line whitespace normalization.
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| SPACE_RUNS.replace_all(line, " ").trim().to_string())
        .collect();

    let start = lines.iter().position(|l| !l.is_empty());
    let Some(start) = start else {
        return String::new();
    };
    let end = lines.iter().rposition(|l| !l.is_empty()).unwrap_or(start);

    lines[start..=end].join("\n")
}

/// Convert literal `\\n` and `\n` tokens (either case) into real newlines.
fn replace_newline_tokens(text: &str) -> String {
    static DOUBLE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)\\\\n").expect("valid pattern"));
    static SINGLE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)\\n").expect("valid pattern"));
    let text = DOUBLE.replace_all(text, "\n");
    SINGLE.replace_all(&text, "\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_and_variable_codes() {
        let input = r"\C[2]こんにちは！\C[0] \V[1] \I[10]";
        assert_eq!(clean_message_text(input), "こんにちは！");
    }

    #[test]
    fn actor_name_code_decays_to_stranded_index() {
        // \N[1]：やった！ — the newline token pass eats the \N first,
        // the stranded [1] before the colon is cleaned afterwards.
        let input = "  \n  \\N[1]：やった！\n\n";
        assert_eq!(clean_message_text(input), "：やった！");
    }

    #[test]
    fn yen_sign_backslash_variant() {
        let input = "¥C[2]やった！¥C[0]";
        assert_eq!(clean_message_text(input), "やった！");
    }

    #[test]
    fn literal_newline_tokens_become_newlines() {
        let single = r"一行目\n二行目";
        assert_eq!(clean_message_text(single), "一行目\n二行目");
        let double = r"一行目\\n二行目";
        assert_eq!(clean_message_text(double), "一行目\n二行目");
    }

    #[test]
    fn size_toggles_removed() {
        let input = r"サイズ\{大きく\}して\}戻す\{";
        assert_eq!(clean_message_text(input), "サイズ大きくして戻す");
    }

    #[test]
    fn wait_and_window_codes_removed() {
        let input = r"待機\. さらに\| 進む\! 終了\^";
        assert_eq!(clean_message_text(input), "待機 さらに 進む 終了");
    }

    #[test]
    fn trims_lines_and_collapses_spaces() {
        let input = "  hello \t world  \n\n  again  ";
        assert_eq!(clean_message_text(input), "hello world\n\nagain");
    }

    #[test]
    fn empty_and_code_only_input() {
        assert_eq!(clean_message_text(""), "");
        assert_eq!(clean_message_text(r"\C[2]\C[0]"), "");
    }
}
