//! Instruction payload for text generation.

use crate::completion::CompletionRequest;

/// English name of a language code, for use inside the directive.
pub fn language_name(code: &str) -> &str {
    match code.to_ascii_lowercase().as_str() {
        "ru" => "Russian",
        "en" => "English",
        "uk" => "Ukrainian",
        "be" => "Belarusian",
        "kk" => "Kazakh",
        "de" => "German",
        "fr" => "French",
        "es" => "Spanish",
        "it" => "Italian",
        "pt" => "Portuguese",
        "pl" => "Polish",
        "tr" => "Turkish",
        "el" => "Greek",
        "ar" => "Arabic",
        "he" => "Hebrew",
        "hi" => "Hindi",
        "ko" => "Korean",
        "ja" => "Japanese",
        "zh" => "Chinese",
        _ => code,
    }
}

/// Build the system directive for answers in `language`.
///
/// The directive forbids reasoning tags and markdown so that the normalizer
/// has as little as possible to strip. `thinking` asks for step-by-step
/// reasoning written as part of the answer.
pub fn build_system_directive(language: &str, thinking: bool) -> String {
    let name = language_name(language);
    let mut directive = format!(
        r#"You are an assistant that answers ONLY in {name}.
Forbidden:
- Using <think> tags or any other XML tags
- Writing in any language other than {name}
- Including internal reasoning in the answer
- Using markdown markup (###, ##, #, **text**)
- Using the * or ** characters for emphasis

Answer requirements:
- Answer clearly, precisely and to the point in {name}
- Use correct punctuation
- Use plain text only, no markdown
- Structure the answer into paragraphs
- Write lists without special symbols
- End every sentence with a period"#
    );

    if thinking {
        directive.push_str(&format!(" Explain your reasoning step by step in {name}."));
    }

    directive
}

/// Assemble the completion request for one question.
pub fn build_request(
    question: &str,
    thinking: bool,
    language: &str,
    model: &str,
    max_tokens: u32,
) -> CompletionRequest {
    CompletionRequest {
        system: build_system_directive(language, thinking),
        question: question.to_string(),
        max_tokens,
        model: model.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_names_the_language() {
        let directive = build_system_directive("ru", false);
        assert!(directive.contains("ONLY in Russian"));
        assert!(directive.contains("no markdown"));
        assert!(!directive.contains("step by step"));
    }

    #[test]
    fn thinking_appends_step_by_step_clause() {
        let directive = build_system_directive("ru", true);
        assert!(directive.ends_with("Explain your reasoning step by step in Russian."));
    }

    #[test]
    fn unknown_codes_are_used_verbatim() {
        assert_eq!(language_name("tlh"), "tlh");
        assert!(build_system_directive("tlh", false).contains("ONLY in tlh"));
    }

    #[test]
    fn request_carries_question_and_limits() {
        let request = build_request("Что такое ИИ?", false, "ru", "HuggingFaceTB/SmolLM3-3B", 2500);
        assert_eq!(request.question, "Что такое ИИ?");
        assert_eq!(request.model, "HuggingFaceTB/SmolLM3-3B");
        assert_eq!(request.max_tokens, 2500);
        assert!(request.system.contains("Russian"));
    }
}
