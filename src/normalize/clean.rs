//! First normalization stage: strip markup and foreign-script lines.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::NormalizerConfig;

/// Punctuation that counts toward the target script in the line filter.
const SCRIPT_PUNCTUATION: [char; 11] = [' ', '.', ',', '!', '?', ';', ':', '-', '«', '»', '—'];

static REASONING_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("Invalid regex"));
static BRACKETED_ASIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("Invalid regex"));
static PARENTHETICAL_ASIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("Invalid regex"));
static STRONG_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid regex"));
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("Invalid regex"));

/// Strip meta-markup from `text` and keep only lines in the target script.
///
/// Removes `<think>...</think>` blocks (across lines), `[...]` and `(...)`
/// asides on a single line, and `**`/`*` emphasis markers. Each remaining
/// line is trimmed; blank lines and lines dominated by other scripts are
/// dropped. Lines with no letters or punctuation at all (numbers, symbols)
/// are kept as they are.
pub fn clean_response(text: &str, config: &NormalizerConfig) -> String {
    let text = REASONING_BLOCK.replace_all(text, "");
    let text = BRACKETED_ASIDE.replace_all(&text, "");
    let text = PARENTHETICAL_ASIDE.replace_all(&text, "");
    let text = STRONG_EMPHASIS.replace_all(&text, "${1}");
    let text = EMPHASIS.replace_all(&text, "${1}");

    let kept: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| is_target_script_line(line, config))
        .collect();

    kept.join("\n").trim().to_string()
}

/// Whether a line is predominantly written in the configured script.
///
/// The share is computed over letters and [`SCRIPT_PUNCTUATION`]; the
/// threshold is exclusive, so a line at exactly the ratio is dropped.
pub(crate) fn is_target_script_line(line: &str, config: &NormalizerConfig) -> bool {
    let mut target = 0usize;
    let mut total = 0usize;

    for c in line.chars() {
        let punctuation = SCRIPT_PUNCTUATION.contains(&c);
        if punctuation || config.target_script.contains(c) {
            target += 1;
        }
        if punctuation || c.is_alphabetic() {
            total += 1;
        }
    }

    if total == 0 {
        return true;
    }

    (target as f64 / total as f64) > config.min_script_ratio
}
