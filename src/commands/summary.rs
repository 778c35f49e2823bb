//! Summarize the character of a saved project

use colored::*;
use eyre::Result;
use serde::Serialize;
use std::path::Path;

use super::build_assembler;
use crate::ability::Project;
use crate::cli::OutputFormat;
use crate::config::Config;

#[derive(Serialize)]
struct Summary<'a> {
    concept: &'a str,
    abilities: usize,
    summary: String,
}

pub fn run(project_path: &Path, concept: Option<&str>, format: OutputFormat, config: &Config) -> Result<()> {
    let project = Project::load(project_path)?;
    let concept = concept.unwrap_or(&project.concept);

    let assembler = build_assembler(config, None);
    let summary = Summary {
        concept,
        abilities: project.abilities.len(),
        summary: assembler.summarize(concept, &project.abilities),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&summary)?);
        }
        OutputFormat::Text => {
            println!("{}", summary.concept.bold());
            println!();
            println!("{}", summary.summary);
        }
    }

    Ok(())
}
