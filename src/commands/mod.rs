//! Subcommand implementations

use colored::*;
use eyre::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::ability::{Ability, AbilityConfig, Assembler, ParameterSet};
use crate::config::Config;
use crate::llm::OllamaClient;

pub mod completions;
pub mod config;
pub mod doctor;
pub mod generate;
pub mod init;
pub mod preview;
pub mod regenerate;
pub mod status;
pub mod summary;

/// Contents of an ability configuration file.
///
/// Either a bare list of configurations or an object carrying the concept
/// next to them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AbilityFile {
    List(Vec<AbilityConfig>),
    Request {
        #[serde(default)]
        concept: Option<String>,
        abilities: Vec<AbilityConfig>,
    },
}

impl AbilityFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read ability file {}", path.display()))?;

        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let file: Self = if is_json {
            serde_json::from_str(&content).context("Failed to parse ability file as JSON")?
        } else {
            serde_yaml::from_str(&content).context("Failed to parse ability file as YAML")?
        };

        log::info!("Loaded {} ability configurations from {}", file.configs().len(), path.display());
        Ok(file)
    }

    pub fn configs(&self) -> &[AbilityConfig] {
        match self {
            AbilityFile::List(configs) => configs,
            AbilityFile::Request { abilities, .. } => abilities,
        }
    }

    pub fn concept(&self) -> Option<&str> {
        match self {
            AbilityFile::List(_) => None,
            AbilityFile::Request { concept, .. } => concept.as_deref(),
        }
    }
}

/// Assembler wired to the configured Ollama server
pub fn build_assembler(config: &Config, seed: Option<u64>) -> Assembler<OllamaClient, StdRng> {
    let rng = match seed {
        Some(seed) => {
            log::info!("Sampling with seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    Assembler::new(OllamaClient::new(&config.llm, config.locale), rng, config.locale)
}

pub fn print_parameters(parameters: &ParameterSet) {
    for (name, param) in parameters {
        println!(
            "    {} {} {}",
            format!("{}:", name).cyan(),
            param.value.to_string().bold(),
            format!("({})", param.description).dimmed()
        );
    }
}

pub fn print_ability(index: usize, ability: &Ability) {
    println!("{} {}", format!("[{}]", index).dimmed(), ability.name.green().bold());
    for line in ability.description.lines() {
        println!("    {}", line);
    }
    print_parameters(&ability.parameters);
}
