//! Ability assembly
//!
//! Samples parameters, asks the text generator for names and descriptions,
//! and falls back to deterministic text whenever the generator fails. A
//! requested ability is never dropped.

use rand::Rng;
use serde::Serialize;

use super::sampler::generate_parameters;
use super::{Ability, AbilityConfig, AbilityError, AbilitySet, ParameterSet};
use crate::llm::TextGenerator;
use crate::llm::prompt::Locale;

/// Sampled parameters shown before any text is generated
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub parameters: ParameterSet,
    pub concept_preview: String,
}

pub struct Assembler<G, R> {
    generator: G,
    rng: R,
    locale: Locale,
}

impl<G: TextGenerator, R: Rng> Assembler<G, R> {
    pub fn new(generator: G, rng: R, locale: Locale) -> Self {
        Self { generator, rng, locale }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generate one ability per configuration.
    ///
    /// Rejects a blank concept or an empty configuration list before any
    /// sampling happens.
    pub fn generate(&mut self, concept: &str, configs: &[AbilityConfig]) -> Result<AbilitySet, AbilityError> {
        if concept.trim().is_empty() {
            return Err(AbilityError::EmptyConcept);
        }
        if configs.is_empty() {
            return Err(AbilityError::NoAbilities);
        }

        let abilities = configs
            .iter()
            .enumerate()
            .map(|(index, config)| self.generate_one(index, concept, config))
            .collect();

        Ok(AbilitySet::new(abilities))
    }

    fn generate_one(&mut self, index: usize, concept: &str, config: &AbilityConfig) -> Ability {
        let parameters = generate_parameters(&mut self.rng, config, self.locale);

        let (name, description) = match self.generator.generate_ability_text(concept, &parameters) {
            Ok(text) => (text.name, text.description),
            Err(e) => {
                log::warn!("Ability {}: text generation failed, using fallback: {}", index, e);
                (
                    self.locale.fallback_name().to_string(),
                    self.locale.fallback_description(&parameters),
                )
            }
        };

        Ability {
            name,
            description,
            parameters,
            config: config.clone(),
        }
    }

    /// Regenerate the name and description of one ability, keeping its
    /// parameters. The set is left untouched on failure.
    pub fn regenerate<'a>(
        &mut self,
        set: &'a mut AbilitySet,
        index: usize,
        concept: &str,
    ) -> Result<&'a Ability, AbilityError> {
        if concept.trim().is_empty() {
            return Err(AbilityError::EmptyConcept);
        }

        let len = set.len();
        let ability = set.get_mut(index).ok_or(AbilityError::NotFound { index, len })?;

        let text = self.generator.generate_ability_text(concept, &ability.parameters)?;
        ability.apply_text(text);
        log::info!("Regenerated ability {}: {}", index, ability.name);

        Ok(ability)
    }

    /// Describe the character as a whole
    pub fn summarize(&self, concept: &str, set: &AbilitySet) -> String {
        if set.is_empty() {
            return self.locale.empty_summary().to_string();
        }

        match self.generator.generate_summary_text(concept, set.as_slice()) {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => {
                log::warn!("Summary generation returned no text, using fallback");
                self.locale.fallback_summary(concept, set.len())
            }
            Err(e) => {
                log::warn!("Summary generation failed, using fallback: {}", e);
                self.locale.fallback_summary(concept, set.len())
            }
        }
    }

    /// Sample parameters for a configuration without generating any text
    pub fn preview(&mut self, config: &AbilityConfig) -> Preview {
        Preview {
            parameters: generate_parameters(&mut self.rng, config, self.locale),
            concept_preview: self.locale.preview_note().to_string(),
        }
    }
}
