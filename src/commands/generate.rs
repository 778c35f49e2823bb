//! Generate a full ability set for a concept

use colored::*;
use eyre::Result;
use std::path::{Path, PathBuf};

use super::{AbilityFile, build_assembler, print_ability};
use crate::ability::Project;
use crate::ability::project::DEFAULT_PROJECT_FILE;
use crate::cli::OutputFormat;
use crate::config::Config;

pub struct GenerateOptions<'a> {
    pub concept: Option<&'a str>,
    pub abilities: &'a Path,
    pub output: Option<&'a PathBuf>,
    pub seed: Option<u64>,
    pub format: OutputFormat,
    pub quiet: bool,
}

pub fn run(opts: GenerateOptions, config: &Config) -> Result<()> {
    let file = AbilityFile::load(opts.abilities)?;
    let concept = opts.concept.or(file.concept()).unwrap_or_default();

    let output_path = opts
        .output
        .cloned()
        .unwrap_or_else(|| config.projects_dir().join(DEFAULT_PROJECT_FILE));

    let mut assembler = build_assembler(config, opts.seed);

    if !opts.quiet && opts.format == OutputFormat::Text {
        println!(
            "{} Generating {} abilities with {}...",
            "→".blue(),
            file.configs().len(),
            config.llm.ability_model.cyan()
        );
    }

    let abilities = assembler.generate(concept, file.configs())?;
    log::info!("Generated {} abilities for concept {:?}", abilities.len(), concept);

    let project = Project::new(concept, abilities);
    project.save(&output_path)?;

    match opts.format {
        OutputFormat::Json => {
            println!("{}", project.to_json()?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&project)?);
        }
        OutputFormat::Text => {
            if !opts.quiet {
                println!();
                for (index, ability) in project.abilities.iter().enumerate() {
                    print_ability(index, ability);
                    println!();
                }
                println!("{} Saved: {}", "✓".green(), output_path.display());
            }
        }
    }

    Ok(())
}
