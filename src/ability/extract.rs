//! Extraction of ability text from model answers
//!
//! Models are asked to answer as `(name:'...';description:'...')` or
//! `(summary:'...')`. They do not always comply, so both extractors have a
//! fallback for free-form answers.

use lazy_regex::regex;
use regex::Regex;

use super::AbilityText;
use crate::llm::prompt::Locale;

/// Maximum length, in characters, of a summary taken from a free-form answer
pub const SUMMARY_FALLBACK_CHARS: usize = 300;

fn ability_pattern(locale: Locale) -> &'static Regex {
    // The description may span lines and ends at the first `')`.
    match locale {
        Locale::En => regex!(r"\(\s*name\s*:\s*'([^']*?)'\s*;\s*description\s*:\s*'([\s\S]*?)'\s*\)"),
        Locale::Ru => regex!(r"\(\s*название\s*:\s*'([^']*?)'\s*;\s*описание\s*:\s*'([\s\S]*?)'\s*\)"),
    }
}

fn summary_pattern(locale: Locale) -> &'static Regex {
    match locale {
        Locale::En => regex!(r"\(\s*summary\s*:\s*'([^']*)'\s*\)"),
        Locale::Ru => regex!(r"\(\s*суммаризация\s*:\s*'([^']*)'\s*\)"),
    }
}

/// Extract a name/description pair from a model answer.
///
/// When the template is missing but some line still mentions a template
/// keyword, the whole answer becomes the description under a placeholder
/// name. Returns `None` when neither applies.
pub fn extract_ability(text: &str, locale: Locale) -> Option<AbilityText> {
    if let Some(caps) = ability_pattern(locale).captures(text) {
        return Some(AbilityText {
            name: caps[1].to_string(),
            description: caps[2].to_string(),
        });
    }

    let keywords = locale.fallback_keywords();
    let mentions_ability = text.lines().any(|line| {
        let line = line.to_lowercase();
        keywords.iter().any(|k| line.contains(k))
    });

    if mentions_ability {
        log::debug!("Ability template not found, using the raw answer as description");
        return Some(AbilityText {
            name: locale.fallback_name().to_string(),
            description: text.trim().to_string(),
        });
    }

    None
}

/// Extract a character summary from a model answer.
///
/// Falls back to the start of the answer, truncated with `...`.
pub fn extract_summary(text: &str, locale: Locale) -> String {
    if let Some(caps) = summary_pattern(locale).captures(text) {
        return caps[1].to_string();
    }

    match text.char_indices().nth(SUMMARY_FALLBACK_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ability_template() {
        let text = extract_ability("(name:'Fireball';description:'Deals damage')", Locale::En).unwrap();
        assert_eq!(text.name, "Fireball");
        assert_eq!(text.description, "Deals damage");
    }

    #[test]
    fn test_extract_ability_surrounded_by_chatter() {
        let answer = "Sure! Here it is:\n(name:'Ice Lance';description:'Pierces armor')\nEnjoy.";
        let text = extract_ability(answer, Locale::En).unwrap();
        assert_eq!(text.name, "Ice Lance");
        assert_eq!(text.description, "Pierces armor");
    }

    #[test]
    fn test_extract_ability_multiline_description() {
        let answer = "(name:'Storm';description:'Calls lightning.\nStuns nearby foes.')";
        let text = extract_ability(answer, Locale::En).unwrap();
        assert_eq!(text.description, "Calls lightning.\nStuns nearby foes.");
    }

    #[test]
    fn test_extract_ability_stops_at_first_segment() {
        let answer = "(name:'A';description:'first') and (name:'B';description:'second')";
        let text = extract_ability(answer, Locale::En).unwrap();
        assert_eq!(text.name, "A");
        assert_eq!(text.description, "first");
    }

    #[test]
    fn test_extract_ability_tolerates_spacing() {
        let answer = "( name : 'Blink' ; description : 'Short teleport' )";
        let text = extract_ability(answer, Locale::En).unwrap();
        assert_eq!(text.name, "Blink");
        assert_eq!(text.description, "Short teleport");
    }

    #[test]
    fn test_extract_ability_russian_template() {
        let answer = "(название:'Огненный шар';описание:'Наносит урон')";
        let text = extract_ability(answer, Locale::Ru).unwrap();
        assert_eq!(text.name, "Огненный шар");
        assert_eq!(text.description, "Наносит урон");
    }

    #[test]
    fn test_extract_ability_keyword_fallback() {
        let answer = "  The Ability is called Frost Step.\nIt slows enemies.  ";
        let text = extract_ability(answer, Locale::En).unwrap();
        assert_eq!(text.name, "Generated Ability");
        assert_eq!(text.description, "The Ability is called Frost Step.\nIt slows enemies.");
    }

    #[test]
    fn test_extract_ability_russian_keyword_fallback() {
        let answer = "\n Эта Способность замораживает врагов.\nДействует три хода. \n";
        let text = extract_ability(answer, Locale::Ru).unwrap();
        assert_eq!(text.name, "Сгенерированная способность");
        assert_eq!(text.description, "Эта Способность замораживает врагов.\nДействует три хода.");

        assert!(extract_ability("Просто текст без шаблона", Locale::Ru).is_none());
    }

    #[test]
    fn test_extract_ability_no_template() {
        assert!(extract_ability("no template here", Locale::En).is_none());
        assert!(extract_ability("", Locale::En).is_none());
    }

    #[test]
    fn test_extract_summary_template() {
        let summary = extract_summary("Result: (summary:'A patient hunter.')", Locale::En);
        assert_eq!(summary, "A patient hunter.");
    }

    #[test]
    fn test_extract_summary_short_fallback() {
        assert_eq!(extract_summary("Just text", Locale::En), "Just text");
    }

    #[test]
    fn test_extract_summary_truncates_by_characters() {
        let long = "ж".repeat(SUMMARY_FALLBACK_CHARS + 20);
        let summary = extract_summary(&long, Locale::En);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), SUMMARY_FALLBACK_CHARS + 3);
    }

    #[test]
    fn test_extract_summary_exact_length_not_truncated() {
        let text = "a".repeat(SUMMARY_FALLBACK_CHARS);
        assert_eq!(extract_summary(&text, Locale::En), text);
    }
}
