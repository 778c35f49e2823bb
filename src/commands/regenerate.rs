//! Regenerate one ability of a saved project

use colored::*;
use eyre::Result;
use std::path::Path;

use super::{build_assembler, print_ability};
use crate::ability::{AbilityError, Project};
use crate::cli::OutputFormat;
use crate::config::Config;

pub fn run(project_path: &Path, index: usize, concept: Option<&str>, format: OutputFormat, config: &Config) -> Result<()> {
    let mut project = Project::load(project_path)?;
    let concept = concept.map(str::to_string).unwrap_or_else(|| project.concept.clone());

    // Parameters are reused, so the seed does not matter here.
    let mut assembler = build_assembler(config, None);

    let ability = match assembler.regenerate(&mut project.abilities, index, &concept) {
        Ok(ability) => ability.clone(),
        Err(e @ AbilityError::NotFound { .. }) => {
            eprintln!("{} {}", "✗".red(), e);
            return Err(e.into());
        }
        Err(e) => {
            eprintln!("{} Could not regenerate ability {}: {}", "✗".red(), index, e);
            return Err(e.into());
        }
    };

    project.save(project_path)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ability)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&ability)?);
        }
        OutputFormat::Text => {
            print_ability(index, &ability);
            println!();
            println!("{} Updated: {}", "✓".green(), project_path.display());
        }
    }

    Ok(())
}
