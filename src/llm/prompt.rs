//! Prompt text and answer templates
//!
//! The model is asked to answer in a fixed parenthesized template whose
//! keywords depend on the language of the conversation. Everything that
//! is language-specific lives on [`Locale`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ability::{Ability, ParameterSet};

/// Language used for prompts, answer templates and fallback text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Ru => write!(f, "ru"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = eyre::Error;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ru" | "russian" => Ok(Locale::Ru),
            _ => eyre::bail!("Unknown locale: {}. Supported: en, ru", s),
        }
    }
}

impl Locale {
    /// Keyword introducing the name in the ability template
    pub fn name_keyword(&self) -> &'static str {
        match self {
            Locale::En => "name",
            Locale::Ru => "название",
        }
    }

    /// Keyword introducing the description in the ability template
    pub fn description_keyword(&self) -> &'static str {
        match self {
            Locale::En => "description",
            Locale::Ru => "описание",
        }
    }

    /// Keyword of the summary template
    pub fn summary_keyword(&self) -> &'static str {
        match self {
            Locale::En => "summary",
            Locale::Ru => "суммаризация",
        }
    }

    /// Words that mark a free-form answer as still being about an ability
    pub fn fallback_keywords(&self) -> &'static [&'static str] {
        match self {
            Locale::En => &["name", "ability"],
            Locale::Ru => &["название", "способность"],
        }
    }

    /// Name given to abilities whose text could not be generated
    pub fn fallback_name(&self) -> &'static str {
        match self {
            Locale::En => "Generated Ability",
            Locale::Ru => "Сгенерированная способность",
        }
    }

    /// Label for a value with no description table
    pub fn value_label(&self, value: i64) -> String {
        match self {
            Locale::En => format!("Value: {}", value),
            Locale::Ru => format!("Значение: {}", value),
        }
    }

    /// Description given to abilities whose text could not be generated
    pub fn fallback_description(&self, parameters: &ParameterSet) -> String {
        let rendered = render_parameters(parameters);
        match self {
            Locale::En => format!("Ability with parameters: {{{}}}", rendered),
            Locale::Ru => format!("Способность с параметрами: {{{}}}", rendered),
        }
    }

    /// Summary returned before anything was generated
    pub fn empty_summary(&self) -> &'static str {
        match self {
            Locale::En => "Abilities have not been generated yet",
            Locale::Ru => "Способности еще не сгенерированы",
        }
    }

    /// Summary used when the model could not be reached
    pub fn fallback_summary(&self, concept: &str, count: usize) -> String {
        match self {
            Locale::En => format!(
                "Character with concept '{}' has {} abilities, each reflecting key aspects of their nature.",
                concept, count
            ),
            Locale::Ru => format!(
                "Персонаж с концепцией '{}' обладает {} способностями, каждая из которых отражает ключевые аспекты его натуры.",
                concept, count
            ),
        }
    }

    /// Note attached to previews, which never call the model
    pub fn preview_note(&self) -> &'static str {
        match self {
            Locale::En => "Preview only - the description is generated during final generation",
            Locale::Ru => "Предварительный просмотр - описание будет сгенерировано при финальной генерации",
        }
    }

    fn unnamed_ability(&self) -> &'static str {
        match self {
            Locale::En => "Unnamed ability",
            Locale::Ru => "Безымянная способность",
        }
    }

    fn undescribed_ability(&self) -> &'static str {
        match self {
            Locale::En => "No description",
            Locale::Ru => "Без описания",
        }
    }
}

/// Render parameters as `name: value (description)` in declaration order
pub fn render_parameters(parameters: &ParameterSet) -> String {
    parameters
        .iter()
        .map(|(name, p)| format!("{}: {} ({})", name, p.value, p.description))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the prompt asking for an ability name and description
pub fn ability_prompt(locale: Locale, concept: &str, parameters: &ParameterSet) -> String {
    let params_text = parameters
        .iter()
        .map(|(name, p)| match locale {
            Locale::En => format!("'{}': {} (value: {})", name, p.description, p.value),
            Locale::Ru => format!("'{}': {} (значение: {})", name, p.description, p.value),
        })
        .collect::<Vec<_>>()
        .join("; ");

    let name = locale.name_keyword();
    let description = locale.description_keyword();

    match locale {
        Locale::En => format!(
            "You are an ability generator for game characters.\n\n\
             Character concept: {concept}\n\n\
             Ability parameters: {params_text}\n\n\
             From this data, invent a name for the ability and a text description that summarizes it. \
             Answer in English, strictly using the template:\n\
             ({name}:'<ability name>';{description}:'<ability description>')\n\n\
             Do not use quotes inside the name or the description."
        ),
        Locale::Ru => format!(
            "Ты генератор способностей для игровых персонажей.\n\n\
             Концепция персонажа: {concept}\n\n\
             Параметры способности: {params_text}\n\n\
             По этим данным придумай название для способности и текстовое описание, которое суммаризирует данную способность. \
             Ответ на русском языке, строго по шаблону:\n\
             ({name}:'<название способности>';{description}:'<описание способности>')\n\n\
             Не используй кавычки внутри названия и описания."
        ),
    }
}

/// Build the prompt asking for an overall character summary
pub fn summary_prompt(locale: Locale, concept: &str, abilities: &[Ability]) -> String {
    let abilities_text = abilities
        .iter()
        .map(|a| {
            let name = if a.name.is_empty() {
                locale.unnamed_ability()
            } else {
                a.name.as_str()
            };
            let description = if a.description.is_empty() {
                locale.undescribed_ability()
            } else {
                a.description.as_str()
            };
            format!("- {}: {}", name, description)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let summary = locale.summary_keyword();

    match locale {
        Locale::En => format!(
            "Using the information below, describe the abilities of this character as a whole.\n\n\
             Character concept: {concept}\n\n\
             Abilities:\n{abilities_text}\n\n\
             Answer strictly using the template ({summary}:'<overall description>')"
        ),
        Locale::Ru => format!(
            "По данной информации выше, опиши в целом способности этого персонажа.\n\n\
             Концепция персонажа: {concept}\n\n\
             Способности:\n{abilities_text}\n\n\
             Ответ строго по шаблону ({summary}:'<общее описание>')"
        ),
    }
}
