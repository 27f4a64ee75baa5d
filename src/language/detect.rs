//! Offline language detection from the dominant Unicode script.

use async_trait::async_trait;

use crate::error::TranslateError;

use super::LanguageService;

/// Writing systems the detector and normalizer distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Cyrillic,
    Greek,
    Arabic,
    Hebrew,
    Devanagari,
    Hangul,
    Kana,
    Han,
}

impl Script {
    /// Detection order; earlier entries win ties.
    pub const ALL: [Script; 9] = [
        Script::Latin,
        Script::Cyrillic,
        Script::Greek,
        Script::Arabic,
        Script::Hebrew,
        Script::Devanagari,
        Script::Hangul,
        Script::Kana,
        Script::Han,
    ];

    /// Script of a single letter, if it belongs to a known one.
    pub fn of(c: char) -> Option<Script> {
        match c {
            'A'..='Z' | 'a'..='z' => Some(Script::Latin),
            '\u{00C0}'..='\u{024F}' if c.is_alphabetic() => Some(Script::Latin),
            '\u{0370}'..='\u{03FF}' => Some(Script::Greek),
            '\u{0400}'..='\u{052F}' => Some(Script::Cyrillic),
            '\u{0590}'..='\u{05FF}' => Some(Script::Hebrew),
            '\u{0600}'..='\u{06FF}' => Some(Script::Arabic),
            '\u{0900}'..='\u{097F}' => Some(Script::Devanagari),
            '\u{1100}'..='\u{11FF}' | '\u{AC00}'..='\u{D7AF}' => Some(Script::Hangul),
            '\u{3040}'..='\u{30FF}' => Some(Script::Kana),
            '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' => Some(Script::Han),
            _ => None,
        }
    }

    /// Whether `c` is a letter written in this script.
    ///
    /// Japanese text mixes kana with Han characters, so Kana covers both.
    pub fn contains(self, c: char) -> bool {
        if !c.is_alphabetic() {
            return false;
        }
        match (self, Script::of(c)) {
            (Script::Kana, Some(Script::Kana | Script::Han)) => true,
            (script, Some(found)) => script == found,
            (_, None) => false,
        }
    }

    /// Language code reported when this script dominates a text.
    pub fn language(self) -> &'static str {
        match self {
            Script::Latin => "en",
            Script::Cyrillic => "ru",
            Script::Greek => "el",
            Script::Arabic => "ar",
            Script::Hebrew => "he",
            Script::Devanagari => "hi",
            Script::Hangul => "ko",
            Script::Kana => "ja",
            Script::Han => "zh",
        }
    }

    /// Script a language is written in. Unknown codes default to Latin.
    pub fn for_language(code: &str) -> Script {
        let primary = code
            .split(['-', '_'])
            .next()
            .unwrap_or(code)
            .to_ascii_lowercase();
        match primary.as_str() {
            "ru" | "uk" | "be" | "bg" | "sr" | "mk" | "kk" | "ky" | "mn" | "tg" => {
                Script::Cyrillic
            }
            "el" => Script::Greek,
            "ar" | "fa" | "ur" | "ps" => Script::Arabic,
            "he" | "yi" => Script::Hebrew,
            "hi" | "mr" | "ne" | "sa" => Script::Devanagari,
            "ko" => Script::Hangul,
            "ja" => Script::Kana,
            "zh" => Script::Han,
            _ => Script::Latin,
        }
    }
}

/// Guess the language of `text` from the script most of its letters use.
///
/// Any kana at all marks the text as Japanese, since Japanese prose is
/// frequently Han-dominated.
pub fn detect_script_language(text: &str) -> Option<&'static str> {
    let mut counts = [0usize; Script::ALL.len()];
    for script in text.chars().filter_map(Script::of) {
        if let Some(slot) = Script::ALL.iter().position(|s| *s == script) {
            counts[slot] += 1;
        }
    }

    let kana_slot = Script::ALL.iter().position(|s| *s == Script::Kana)?;
    if counts[kana_slot] > 0 {
        return Some(Script::Kana.language());
    }

    let mut best: Option<(Script, usize)> = None;
    for (script, count) in Script::ALL.iter().zip(counts) {
        if count > 0 && best.is_none_or(|(_, top)| count > top) {
            best = Some((*script, count));
        }
    }
    best.map(|(script, _)| script.language())
}

/// Language service that only detects, using [`detect_script_language`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

impl ScriptDetector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LanguageService for ScriptDetector {
    async fn detect(&self, text: &str) -> Result<String, TranslateError> {
        detect_script_language(text)
            .map(str::to_string)
            .ok_or(TranslateError::Undetermined)
    }

    async fn translate(
        &self,
        _text: &str,
        _source: Option<&str>,
        _target: &str,
    ) -> Result<String, TranslateError> {
        Err(TranslateError::Unsupported)
    }
}
