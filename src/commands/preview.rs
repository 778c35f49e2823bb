//! Preview sampled parameters without calling the model

use colored::*;
use eyre::Result;
use std::path::Path;

use super::{AbilityFile, build_assembler, print_parameters};
use crate::cli::OutputFormat;
use crate::config::Config;

pub fn run(abilities: &Path, seed: Option<u64>, format: OutputFormat, config: &Config) -> Result<()> {
    let file = AbilityFile::load(abilities)?;
    let mut assembler = build_assembler(config, seed);

    let previews: Vec<_> = file.configs().iter().map(|c| assembler.preview(c)).collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&previews)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&previews)?);
        }
        OutputFormat::Text => {
            for (index, preview) in previews.iter().enumerate() {
                println!("{} {}", format!("[{}]", index).dimmed(), preview.concept_preview.italic());
                print_parameters(&preview.parameters);
                println!();
            }
        }
    }

    Ok(())
}
