pub const SYSTEM_PROMPT_TEMPLATE: &str = "You are a translator. Detect the language of the user's message \
     and translate it to {target_language}. \
     Output only the translated text without any explanations or quotes. \
     Preserve the original formatting including line breaks, emoji and punctuation.";

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(target_language: &str) -> String {
    // {target_language} is a placeholder for string replacement, not a format argument
    SYSTEM_PROMPT_TEMPLATE.replace("{target_language}", target_language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_system_prompt() {
        let prompt = build_system_prompt("Russian (ru)");
        assert!(prompt.contains("translate it to Russian (ru)"));
        assert!(!prompt.contains("{target_language}"));
    }
}
