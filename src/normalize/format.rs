//! Second normalization stage: punctuation spacing and paragraph layout.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::NormalizerConfig;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]*(.*?)[ \t]*$").expect("Invalid regex")
});
static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,:;!?])").expect("Invalid regex"));
static SPACE_AFTER_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.,:;!?])\s+").expect("Invalid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

const LIST_MARKERS: [char; 5] = ['-', '*', '•', '—', '–'];
const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Re-flow cleaned text into paragraphs separated by blank lines.
///
/// List items and short unterminated lines (headings) each become their own
/// paragraph. Other sentences accumulate into a paragraph until it grows
/// past `paragraph_max_chars`.
pub fn format_response(text: &str, config: &NormalizerConfig) -> String {
    let text = HEADING.replace_all(text, "${1}");
    let text = unify_whitespace(&text);
    let text = SPACE_BEFORE_PUNCTUATION.replace_all(&text, "${1}");
    let text = SPACE_AFTER_PUNCTUATION.replace_all(&text, "${1} ");
    let text = WHITESPACE_RUN.replace_all(&text, " ");

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for sentence in split_sentences(&text) {
        if is_list_item(sentence) || is_heading(sentence, config) {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
            paragraphs.push(sentence.to_string());
            continue;
        }

        current.push(sentence);
        let joined = current.join(" ");
        if joined.chars().count() > config.paragraph_max_chars {
            paragraphs.push(joined);
            current.clear();
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}

/// Replace every Unicode whitespace character with an ASCII space.
///
/// `\s` in `regex_lite` only matches ASCII whitespace, so NBSP and friends
/// must be mapped before the spacing patterns run.
fn unify_whitespace(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}

/// Split on single spaces that follow `.`, `!` or `?`.
///
/// Expects whitespace already collapsed to single spaces.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut previous = None;

    for (idx, ch) in text.char_indices() {
        if ch == ' ' && previous.is_some_and(|p| TERMINAL_PUNCTUATION.contains(&p)) {
            sentences.push(text[start..idx].trim());
            start = idx + ch.len_utf8();
        }
        previous = Some(ch);
    }
    sentences.push(text[start..].trim());

    sentences.retain(|s| !s.is_empty());
    sentences
}

/// `1.`, `-`, `*`, `•`, `—` or `–` at the start of a sentence.
fn is_list_item(sentence: &str) -> bool {
    if sentence.starts_with(LIST_MARKERS) {
        return true;
    }
    let rest = sentence.trim_start_matches(char::is_numeric);
    rest.len() < sentence.len() && rest.starts_with('.')
}

fn is_heading(sentence: &str, config: &NormalizerConfig) -> bool {
    sentence.chars().count() < config.heading_max_chars
        && !sentence.ends_with(TERMINAL_PUNCTUATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(text: &str) -> String {
        format_response(text, &NormalizerConfig::default())
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(format(""), "");
        assert_eq!(format("   \n  "), "");
    }

    #[test]
    fn heading_markers_are_removed() {
        assert_eq!(format("### Введение"), "Введение");
        assert_eq!(format("# Заголовок  "), "Заголовок");
    }

    #[test]
    fn punctuation_spacing_is_normalized() {
        assert_eq!(format("Привет , мир !Как дела ?"), "Привет, мир!Как дела?");
        assert_eq!(format("Один.   Два,  три."), "Один. Два, три.");
    }

    #[test]
    fn headings_and_list_items_stand_alone() {
        let text = "ИИ изучает обучение машин. Это важная область.\n- Первый пункт.\n• Второй пункт.\nИтоги";
        let expected = "ИИ изучает обучение машин. Это важная область.\n\n- Первый пункт.\n\n• Второй пункт.\n\nИтоги";
        assert_eq!(format(text), expected);
    }

    #[test]
    fn numbered_marker_is_split_from_its_text() {
        assert_eq!(format("Шаги. 1. Открыть."), "Шаги.\n\n1.\n\nОткрыть.");
    }

    #[test]
    fn unicode_spaces_are_collapsed() {
        assert_eq!(
            format("Привет\u{00A0}, мир.\u{00A0}\u{00A0}Как дела?"),
            "Привет, мир. Как дела?"
        );
        assert_eq!(
            format("Один.\u{2003}Два\u{202F}!\u{202F}Три."),
            "Один. Два! Три."
        );
    }

    #[test]
    fn nbsp_after_terminal_punctuation_ends_a_sentence() {
        let text = "Первое предложение.\u{00A0}- пункт списка";
        assert_eq!(format(text), "Первое предложение.\n\n- пункт списка");
    }

    #[test]
    fn line_breaks_do_not_end_sentences() {
        // Whitespace is collapsed before splitting, so an unpunctuated line
        // runs into the next sentence.
        assert_eq!(
            format("Основные понятия\nИИ изучает обучение машин."),
            "Основные понятия ИИ изучает обучение машин."
        );
    }

    #[test]
    fn unterminated_list_fragment_is_its_own_paragraph() {
        assert_eq!(format("— незаконченный пункт"), "— незаконченный пункт");
        assert_eq!(
            format("Первое предложение. • фрагмент списка"),
            "Первое предложение.\n\n• фрагмент списка"
        );
    }

    #[test]
    fn long_paragraphs_are_split() {
        let sentence = "Это достаточно длинное предложение для проверки разбиения абзацев на части.";
        let text = vec![sentence; 10].join(" ");

        let output = format(&text);
        let paragraphs: Vec<&str> = output.split("\n\n").collect();

        assert!(paragraphs.len() > 1);
        for paragraph in &paragraphs[..paragraphs.len() - 1] {
            assert!(paragraph.chars().count() > 500);
        }
        assert_eq!(
            paragraphs.iter().map(|p| p.matches(sentence).count()).sum::<usize>(),
            10
        );
    }

    #[test]
    fn long_unterminated_sentence_is_not_a_heading() {
        let text = "Это предложение без точки в конце, но оно длиннее пятидесяти символов";
        assert_eq!(format(&format!("Начало. {}", text)), format!("Начало. {}", text));
    }

    #[test]
    fn sentences_split_only_after_terminal_punctuation() {
        assert_eq!(
            split_sentences("Один. Два! Три? Четыре, пять"),
            vec!["Один.", "Два!", "Три?", "Четыре, пять"]
        );
    }

    #[test]
    fn every_terminal_mark_followed_by_space_splits() {
        assert_eq!(
            split_sentences("Шаги. 1. Открыть. 2. Закрыть."),
            vec!["Шаги.", "1.", "Открыть.", "2.", "Закрыть."]
        );
        assert_eq!(split_sentences("Сколько? 42. Да."), vec!["Сколько?", "42.", "Да."]);
    }

    #[test]
    fn numbered_items_need_a_dot() {
        assert!(is_list_item("12. Пункт"));
        assert!(is_list_item("3."));
        assert!(!is_list_item("2024 год был богат событиями."));
        assert!(!is_list_item(". Пункт"));
    }

    #[test]
    fn non_ascii_digits_number_list_items() {
        assert!(is_list_item("١. عنصر"));
        assert!(is_list_item("٣."));
        assert!(is_list_item("１２. 項目"));
    }
}
