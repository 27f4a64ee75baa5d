//! Cleanup and re-flow of raw model output.
//!
//! Normalization runs in two stages:
//! 1. [`clean_response`] removes reasoning blocks, asides and emphasis
//!    markers, then drops lines that are mostly outside the target script.
//! 2. [`format_response`] fixes punctuation spacing and regroups sentences
//!    into paragraphs, list items and headings.
//!
//! Both stages are pure functions of their input.

pub mod clean;
pub mod format;

use crate::language::Script;

pub use clean::clean_response;
pub use format::format_response;

/// Tunable thresholds for normalization.
///
/// The defaults are heuristics tuned for Russian output; change them only
/// with evidence from real responses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerConfig {
    /// Script a line must be written in to survive cleaning.
    pub target_script: Script,
    /// A line is kept only if its target-script share is strictly above this.
    pub min_script_ratio: f64,
    /// Sentences shorter than this without terminal punctuation are headings.
    pub heading_max_chars: usize,
    /// A paragraph is closed once its length exceeds this.
    pub paragraph_max_chars: usize,
}

impl NormalizerConfig {
    pub fn for_script(target_script: Script) -> Self {
        Self {
            target_script,
            ..Self::default()
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            target_script: Script::Cyrillic,
            min_script_ratio: 0.5,
            heading_max_chars: 50,
            paragraph_max_chars: 500,
        }
    }
}

/// Applies both normalization stages with one configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn normalize(&self, raw: &str) -> String {
        format_response(&clean_response(raw, &self.config), &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasoning_block_is_removed_entirely() {
        let normalizer = Normalizer::default();
        let output = normalizer.normalize("<think>internal notes</think>Привет, как дела?");
        assert_eq!(output, "Привет, как дела?");
    }

    #[test]
    fn normalize_is_stable_on_clean_text() {
        let normalizer = Normalizer::default();
        let text = "Искусственный интеллект изучает обучение машин. Он используется в медицине и транспорте.";
        let once = normalizer.normalize(text);
        assert_eq!(once, text);
        assert_eq!(normalizer.normalize(&once), once);
    }

    #[test]
    fn latin_target_keeps_english_lines() {
        let normalizer = Normalizer::new(NormalizerConfig::for_script(Script::Latin));
        let output = normalizer.normalize("Hello there, **friend**.\nПривет, друг.");
        assert_eq!(output, "Hello there, friend.");
    }
}
